use oddsfeed::domain::{Culture, Specifiers};
use oddsfeed::error::{GenerationCause, NameError, TemplateError, UrnError};
use oddsfeed::naming::{evaluate, ordinal, parse, resolve_entity_list, TemplateRegistry};
use oddsfeed::testkit::resolver::StaticEntityResolver;

fn en() -> Culture {
    Culture::from("en")
}

fn resolver() -> StaticEntityResolver {
    StaticEntityResolver::new()
        .with_competitors(["Liverpool FC", "Everton FC"])
        .with_event("Liverpool FC vs. Everton FC")
        .with_player("sr:player:1", "Mohamed Salah")
        .with_player("sr:player:2", "Virgil van Dijk")
        .with_competitor("sr:competitor:44", "Liverpool FC")
}

async fn render(template: &str, specifiers: &str) -> Result<String, NameError> {
    let ast = parse(template)?;
    let specifiers = Specifiers::parse(specifiers).expect("valid specifiers");
    evaluate(&ast, &specifiers, &resolver(), &en()).await
}

#[test]
fn ordinals_follow_english_suffixes() {
    let cases = [
        (1, "1st"),
        (2, "2nd"),
        (3, "3rd"),
        (4, "4th"),
        (11, "11th"),
        (12, "12th"),
        (13, "13th"),
        (21, "21st"),
        (22, "22nd"),
        (23, "23rd"),
        (24, "24th"),
        (111, "111th"),
        (101, "101st"),
    ];
    for (n, expected) in cases {
        assert_eq!(ordinal(n), expected, "ordinal({n})");
    }
}

#[test]
fn literal_template_renders_unchanged() {
    let template = "1x2 (incl. overtime and penalties)";
    let rendered = tokio_test::block_on(render(template, "")).unwrap();
    assert_eq!(rendered, template);
}

#[tokio::test]
async fn runs_scored_ordinal() {
    let name = render(
        "When will the {!runnr} run be scored (incl. extra innings)",
        "inningnr=5|runnr=3",
    )
    .await
    .unwrap();
    assert_eq!(name, "When will the 3rd run be scored (incl. extra innings)");
}

#[tokio::test]
async fn mixed_operands() {
    let name = render(
        "{$competitor1} ({+hcp}) - {!(setnr+1)} set, {(total-0)} points",
        "hcp=-1.5|setnr=1|total=20.5",
    )
    .await
    .unwrap();
    assert_eq!(name, "Liverpool FC (-1.5) - 2nd set, 20.5 points");

    let name = render("{$event}: {-hcp}", "hcp=0").await.unwrap();
    assert_eq!(name, "Liverpool FC vs. Everton FC: 0");
}

#[test]
fn unbalanced_template_names_brace() {
    let err = parse("When will the {{!runnr}").unwrap_err();
    assert!(matches!(err, TemplateError::UnmatchedOpen { .. }));
    assert!(err.to_string().contains("unmatched '{'"));
}

#[tokio::test]
async fn group_reference_keeps_order() {
    let names = resolve_entity_list(&resolver(), "sr:player:2,sr:player:1", &en())
        .await
        .unwrap();
    assert_eq!(names, "Virgil van Dijk,Mohamed Salah");
}

#[tokio::test]
async fn group_reference_cites_malformed_element() {
    let err = resolve_entity_list(&resolver(), "sr:player:1,bad:2", &en())
        .await
        .unwrap_err();

    match err {
        NameError::Generation { id, cause } => {
            assert_eq!(id, "bad:2");
            assert_eq!(
                cause,
                GenerationCause::InvalidId(UrnError::WrongFormat {
                    value: "bad:2".into()
                })
            );
        }
        other => panic!("expected generation error, got {other:?}"),
    }
}

#[test]
fn registry_compiles_each_template_once() {
    let registry = TemplateRegistry::new();
    for _ in 0..3 {
        registry.get_or_parse("{!setnr} set - winner").unwrap();
        registry.get_or_parse("{$competitor1} to win").unwrap();
    }
    assert_eq!(registry.len(), 2);
}
