//! Handler for the `valid-for` command.

use crate::cli::ValidForArgs;
use crate::domain::Specifiers;
use crate::error::Result;
use crate::mapping::ValidatorExpression;

/// Execute `valid-for`; `true` when the expression accepts the specifiers.
pub fn execute(args: &ValidForArgs) -> Result<bool> {
    let expression = ValidatorExpression::build(&args.expr)?;
    let specifiers = Specifiers::parse(&args.specifiers)?;
    Ok(expression.accepts(&specifiers)?)
}
