//! Template tokenizer and placeholder parser.

use super::ast::{ArithmeticOp, CompetitorSelector, NameAst, OperandExpr, Segment};
use crate::error::TemplateError;

/// Parse a name template into literal and placeholder segments.
///
/// Every `{` must be closed by a `}` before the next `{`, and every `}` must
/// close an open `{`. Positions in errors are byte offsets into `template`.
pub fn parse(template: &str) -> Result<NameAst, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut open: Option<usize> = None;

    for (pos, ch) in template.char_indices() {
        match (ch, open) {
            ('{', None) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                open = Some(pos);
            }
            ('{', Some(start)) => {
                return Err(TemplateError::UnmatchedOpen {
                    template: template.to_string(),
                    position: start,
                });
            }
            ('}', Some(start)) => {
                let body = &template[start + 1..pos];
                segments.push(Segment::Placeholder(parse_operand(template, body, start)?));
                open = None;
            }
            ('}', None) => {
                return Err(TemplateError::UnmatchedClose {
                    template: template.to_string(),
                    position: pos,
                });
            }
            (_, Some(_)) => {}
            (c, None) => literal.push(c),
        }
    }

    if let Some(start) = open {
        return Err(TemplateError::UnmatchedOpen {
            template: template.to_string(),
            position: start,
        });
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(NameAst::new(template, segments))
}

fn parse_operand(template: &str, body: &str, position: usize) -> Result<OperandExpr, TemplateError> {
    let malformed = || TemplateError::MalformedExpression {
        template: template.to_string(),
        expression: body.to_string(),
        position,
    };

    let body = body.trim();
    let mut chars = body.chars();
    let first = chars.next().ok_or_else(malformed)?;
    let rest = chars.as_str();

    let expr = match first {
        '$' => match rest {
            "event" => OperandExpr::EventRef,
            _ => {
                let index = rest
                    .strip_prefix("competitor")
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|&n| n > 0)
                    .ok_or_else(malformed)?;
                OperandExpr::CompetitorRef(CompetitorSelector::Index(index))
            }
        },
        '%' => {
            let key = identifier(rest).ok_or_else(malformed)?;
            match key {
                "player" => OperandExpr::PlayerRef(key.to_string()),
                "competitor" => OperandExpr::CompetitorRef(CompetitorSelector::Named(key.to_string())),
                _ => OperandExpr::GroupRef(key.to_string()),
            }
        }
        '!' if rest.starts_with('(') => arithmetic(rest, true).ok_or_else(malformed)?,
        '!' => OperandExpr::OrdinalRef(identifier(rest).ok_or_else(malformed)?.to_string()),
        '+' | '-' => OperandExpr::SignedRef {
            key: identifier(rest).ok_or_else(malformed)?.to_string(),
            negate: first == '-',
        },
        '(' => arithmetic(body, false).ok_or_else(malformed)?,
        _ => OperandExpr::SpecifierRef(identifier(body).ok_or_else(malformed)?.to_string()),
    };

    Ok(expr)
}

/// `(key+N)` / `(key-N)` with an integer literal.
fn arithmetic(text: &str, ordinal: bool) -> Option<OperandExpr> {
    let inner = text.strip_prefix('(')?.strip_suffix(')')?;
    let split = inner.find(&['+', '-'][..])?;
    let key = identifier(inner[..split].trim())?;
    let op = match &inner[split..split + 1] {
        "+" => ArithmeticOp::Add,
        _ => ArithmeticOp::Subtract,
    };
    let literal = inner[split + 1..].trim().parse::<i64>().ok()?;

    Some(OperandExpr::Arithmetic {
        key: key.to_string(),
        op,
        literal,
        ordinal,
    })
}

fn identifier(text: &str) -> Option<&str> {
    let valid = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some(text)
}
