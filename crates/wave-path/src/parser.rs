//! Pest-based parser for subfield paths

use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;
use wave_ir::{PathElement, Subfield};

#[derive(Parser)]
#[grammar = "subfield.pest"]
struct SubfieldGrammar;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Empty subfield path")]
    Empty,

    #[error("Malformed subfield path '{path}' at offset {position}: {message}")]
    Malformed {
        path: String,
        position: usize,
        message: String,
    },

    #[error("Invalid subscript '{subscript}' in subfield path '{path}'")]
    InvalidSubscript { path: String, subscript: String },
}

impl PathError {
    /// Raw input that failed to parse
    pub fn path(&self) -> &str {
        match self {
            PathError::Empty => "",
            PathError::Malformed { path, .. } | PathError::InvalidSubscript { path, .. } => path,
        }
    }
}

/// Parse a raw field reference into its canonical [`Subfield`].
///
/// A plain column name yields a single-segment subfield; dotted and
/// subscripted forms yield multi-segment paths.
pub fn parse_subfield(raw: &str) -> Result<Subfield, PathError> {
    if raw.is_empty() {
        return Err(PathError::Empty);
    }

    let mut pairs = SubfieldGrammar::parse(Rule::path, raw).map_err(|e| {
        let position = match e.location {
            InputLocation::Pos(pos) => pos,
            InputLocation::Span((start, _)) => start,
        };
        PathError::Malformed {
            path: raw.to_string(),
            position,
            message: e.variant.message().into_owned(),
        }
    })?;

    let path_pair = pairs.next().ok_or_else(|| malformed(raw, 0, "empty parse"))?;

    let mut elements = Vec::new();
    for pair in path_pair.into_inner() {
        match pair.as_rule() {
            Rule::name => elements.push(PathElement::Field(pair.as_str().to_string())),
            Rule::dot_field => elements.push(parse_dot_field(raw, pair)?),
            Rule::all => elements.push(PathElement::AllSubscripts),
            Rule::long => {
                let text = pair.as_str();
                let index = text.parse::<i64>().map_err(|_| PathError::InvalidSubscript {
                    path: raw.to_string(),
                    subscript: text.to_string(),
                })?;
                elements.push(PathElement::LongSubscript(index));
            }
            Rule::string => {
                let key = pair.into_inner().next().map(|k| k.as_str()).unwrap_or("");
                elements.push(PathElement::StringSubscript(key.to_string()));
            }
            Rule::EOI => {}
            other => {
                return Err(malformed(
                    raw,
                    pair.as_span().start(),
                    &format!("unexpected element {:?}", other),
                ))
            }
        }
    }

    Ok(Subfield::new(elements))
}

fn parse_dot_field(raw: &str, pair: Pair<Rule>) -> Result<PathElement, PathError> {
    let start = pair.as_span().start();
    let name = pair
        .into_inner()
        .next()
        .ok_or_else(|| malformed(raw, start, "missing field name after '.'"))?;
    Ok(PathElement::Field(name.as_str().to_string()))
}

fn malformed(raw: &str, position: usize, message: &str) -> PathError {
    PathError::Malformed {
        path: raw.to_string(),
        position,
        message: message.to_string(),
    }
}
