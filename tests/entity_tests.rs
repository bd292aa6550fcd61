use std::sync::Arc;

use oddsfeed::catalog::MarketCatalog;
use oddsfeed::config::{CatalogConfig, Config};
use oddsfeed::domain::{
    Culture, LocalizedText, MarketDescription, MarketId, MarketMapping, OutcomeDescription,
    OutcomeId, Specifiers, Urn,
};
use oddsfeed::entity::{ExceptionHandlingStrategy, MarketFactory, OutcomeMapping};
use oddsfeed::error::{Error, NameError};
use oddsfeed::mapping::ValidatorExpression;
use oddsfeed::testkit::resolver::StaticEntityResolver;
use oddsfeed::testkit::source::StaticDescriptionSource;

fn text(pairs: &[(&str, &str)]) -> LocalizedText {
    let mut t = LocalizedText::new();
    for (culture, value) in pairs {
        t.insert(Culture::from(*culture), *value);
    }
    t
}

fn source() -> Arc<StaticDescriptionSource> {
    Arc::new(
        StaticDescriptionSource::new()
            .with_invariant(
                MarketDescription::new(
                    18,
                    text(&[("en", "Total"), ("de", "Total")]),
                )
                .with_outcome(OutcomeDescription::new(
                    "12",
                    text(&[("en", "over {total}"), ("de", "über {total}")]),
                ))
                .with_outcome(OutcomeDescription::new(
                    "13",
                    text(&[("en", "under {total}"), ("de", "unter {total}")]),
                ))
                .with_mapping(
                    MarketMapping::new("lo:2", vec![1])
                        .with_valid_for(ValidatorExpression::build("total~*.5").unwrap())
                        .with_outcome("12", "lo:2:over")
                        .with_outcome("13", "lo:2:under"),
                ),
            )
            .with_invariant(MarketDescription::new(
                768,
                text(&[("en", "{%player} points (incl. overtime)")]),
            ))
            .with_single_variant(
                MarketDescription::new(768, text(&[("en", "{%player} points (incl. overtime)")]))
                    .with_variant("pre:playerprops:35432179:608000")
                    .with_outcome(OutcomeDescription::new(
                        "sr:player:1",
                        text(&[("en", "ignored")]),
                    )),
            ),
    )
}

fn factory(source: Arc<StaticDescriptionSource>, strategy: &str) -> MarketFactory {
    let config: Config = toml::from_str(&format!(
        "[naming]\ndefault_cultures = [\"en\"]\nexception_handling = \"{strategy}\"\n"
    ))
    .unwrap();
    let catalog = Arc::new(MarketCatalog::new(source, &CatalogConfig::default()));
    MarketFactory::from_config(catalog, &config)
}

fn resolver() -> Arc<StaticEntityResolver> {
    Arc::new(StaticEntityResolver::new().with_player("sr:player:1", "LeBron James"))
}

#[tokio::test]
async fn market_and_outcome_names() {
    let factory = factory(source(), "throw");
    let market = factory.build(
        MarketId::new(18),
        Specifiers::parse("total=2.5").unwrap(),
        vec![OutcomeId::from("12"), OutcomeId::from("13")],
        resolver(),
    );

    let en = Culture::from("en");
    let de = Culture::from("de");
    assert_eq!(market.name(&en).await.unwrap().as_deref(), Some("Total"));

    let outcome = market.outcome(&OutcomeId::from("13")).unwrap();
    assert_eq!(outcome.name(&de).await.unwrap().as_deref(), Some("unter 2.5"));

    let names = market.names(&[en.clone(), de.clone()]).await.unwrap();
    assert_eq!(names.len(), 2);
}

#[tokio::test]
async fn names_are_memoized_per_entity() {
    let source = source();
    let factory = factory(source.clone(), "throw");
    let market = factory.build(
        MarketId::new(18),
        Specifiers::parse("total=2.5").unwrap(),
        vec![],
        resolver(),
    );

    let de = Culture::from("de");
    market.name(&de).await.unwrap();
    market.name(&de).await.unwrap();
    assert_eq!(source.invariant_calls(), 1);
}

#[tokio::test]
async fn player_props_resolve_through_single_variant() {
    let source = source();
    let factory = factory(source.clone(), "throw");
    let market = factory.build(
        MarketId::new(768),
        Specifiers::parse("variant=pre:playerprops:35432179:608000|player=sr:player:1").unwrap(),
        vec![OutcomeId::from("sr:player:1")],
        resolver(),
    );

    let en = Culture::from("en");
    assert_eq!(
        market.name(&en).await.unwrap().as_deref(),
        Some("LeBron James points (incl. overtime)")
    );
    let outcome = &market.outcomes()[0];
    assert_eq!(outcome.name(&en).await.unwrap().as_deref(), Some("LeBron James"));
    assert_eq!(source.single_variant_calls(), 1);
    assert_eq!(source.variant_list_calls(), 0);
}

#[tokio::test]
async fn throw_mode_reports_missing_specifier() {
    let factory = factory(source(), "throw");
    let market = factory.build(MarketId::new(768), Specifiers::new(), vec![], resolver());

    let err = market.name(&Culture::from("en")).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Name(NameError::MissingSpecifier { ref key }) if key == "player"
    ));
}

#[tokio::test]
async fn catch_mode_answers_none_and_retries() {
    let source = source();
    let factory = factory(source.clone(), "catch");
    assert_eq!(factory.strategy(), ExceptionHandlingStrategy::Catch);
    let market = factory.build(MarketId::new(404), Specifiers::new(), vec![], resolver());

    let en = Culture::from("en");
    assert_eq!(market.name(&en).await.unwrap(), None);
    assert_eq!(market.name(&en).await.unwrap(), None);
}

#[tokio::test]
async fn mappings_use_live_specifiers() {
    let factory = factory(source(), "throw");
    let sport = Urn::parse("sr:sport:1").unwrap();

    let half = factory.build(
        MarketId::new(18),
        Specifiers::parse("total=2.5").unwrap(),
        vec![OutcomeId::from("12")],
        resolver(),
    );
    let mappings = half.valid_mappings(1, &sport).await.unwrap().unwrap();
    assert_eq!(mappings.len(), 1);
    let mapped = half.outcomes()[0].mappings(1, &sport).await.unwrap().unwrap();
    assert_eq!(
        mapped,
        vec![OutcomeMapping {
            market_id: "lo:2".into(),
            outcome_id: "lo:2:over".into()
        }]
    );

    let whole = factory.build(
        MarketId::new(18),
        Specifiers::parse("total=3").unwrap(),
        vec![],
        resolver(),
    );
    assert!(whole.valid_mappings(1, &sport).await.unwrap().unwrap().is_empty());
}
