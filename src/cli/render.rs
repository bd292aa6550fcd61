//! Handler for the `render` command.

use tracing::debug;

use crate::cli::resolver::ArgumentResolver;
use crate::cli::RenderArgs;
use crate::domain::{Culture, Specifiers};
use crate::error::Result;
use crate::naming::{evaluate, TemplateRegistry};

/// Execute `render`, returning the rendered name.
pub async fn execute(args: RenderArgs) -> Result<String> {
    let specifiers = Specifiers::parse(&args.specifiers)?;
    let culture = Culture::from(args.culture.as_str());
    let resolver = ArgumentResolver::new(args.competitors, args.entities, args.event);

    let ast = TemplateRegistry::global().get_or_parse(&args.template)?;
    debug!(
        template = %args.template,
        segments = ast.segments().len(),
        "Parsed template"
    );

    Ok(evaluate(&ast, &specifiers, &resolver, &culture).await?)
}
