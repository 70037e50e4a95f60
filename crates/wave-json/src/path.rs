//! JSON path tokenizer

use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "json_path.pest"]
struct JsonPathGrammar;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonPathError {
    #[error("Invalid JSON path: {path}: {message}")]
    Invalid { path: String, message: String },
}

/// Tokenized JSON path.
///
/// Tokens are kept as text: `*` is the wildcard, anything else is an object
/// key or, when applied to an array, a zero-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    tokens: Vec<String>,
}

impl JsonPath {
    pub fn parse(path: &str) -> Result<Self, JsonPathError> {
        let invalid = |message: String| JsonPathError::Invalid {
            path: path.to_string(),
            message,
        };

        let mut pairs = JsonPathGrammar::parse(Rule::json_path, path)
            .map_err(|e| invalid(e.variant.message().into_owned()))?;
        let root = pairs
            .next()
            .ok_or_else(|| invalid("empty path".to_string()))?;

        let mut tokens = Vec::new();
        for pair in root.into_inner() {
            match pair.as_rule() {
                Rule::wildcard | Rule::index | Rule::unquoted_key => {
                    tokens.push(pair.as_str().to_string())
                }
                Rule::quoted_key => {
                    let key = pair.into_inner().next().map(|k| k.as_str()).unwrap_or("");
                    tokens.push(key.to_string());
                }
                Rule::EOI => {}
                other => return Err(invalid(format!("unexpected token {:?}", other))),
            }
        }

        Ok(Self {
            raw: path.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// True for the bare `$` path
    pub fn is_root_only(&self) -> bool {
        self.tokens.is_empty()
    }
}
