//! JSON value extraction with a bounded cache of tokenized paths

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::path::{JsonPath, JsonPathError};

/// Max number of tokenized paths kept by default
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Extracts sub-values from JSON text.
///
/// Tokenized paths are cached by path string, least recently used first out.
#[derive(Debug)]
pub struct JsonExtractor {
    cache: IndexMap<String, Arc<JsonPath>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for JsonExtractor {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl JsonExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            cache: IndexMap::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Extract every value `path` selects from `json`.
    ///
    /// Returns `Err` when the path is invalid, `Ok(None)` when `json` does not
    /// parse, and `Ok(Some(vec![]))` when nothing matches.
    pub fn extract(&mut self, json: &str, path: &str) -> Result<Option<Vec<Value>>, JsonPathError> {
        let compiled = self.compiled(path)?;

        let document: Value = match serde_json::from_str(json) {
            Ok(document) => document,
            Err(e) => {
                trace!(error = %e, "malformed JSON input");
                return Ok(None);
            }
        };

        if compiled.is_root_only() {
            return Ok(Some(vec![document]));
        }

        let mut out = Vec::new();
        extract_tokens(&document, compiled.tokens(), &mut out);
        Ok(Some(out))
    }

    /// Tokenized form of `path`, from the cache when possible
    pub fn compiled(&mut self, path: &str) -> Result<Arc<JsonPath>, JsonPathError> {
        if let Some(index) = self.cache.get_index_of(path) {
            self.hits += 1;
            let last = self.cache.len() - 1;
            self.cache.move_index(index, last);
            if let Some((_, compiled)) = self.cache.get_index(last) {
                return Ok(Arc::clone(compiled));
            }
        }

        self.misses += 1;
        let compiled = Arc::new(JsonPath::parse(path)?);
        if self.cache.len() >= self.capacity {
            if let Some((evicted, _)) = self.cache.shift_remove_index(0) {
                debug!(path = %evicted, "evicted JSON path from cache");
            }
        }
        self.cache.insert(path.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn cached_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.cache.keys().map(String::as_str)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

fn extract_tokens(value: &Value, tokens: &[String], out: &mut Vec<Value>) {
    let mut current = value;

    for (i, token) in tokens.iter().enumerate() {
        let next = match current {
            Value::Object(object) => object.get(token.as_str()),
            Value::Array(items) if token == "*" => {
                let rest = &tokens[i + 1..];
                for item in items {
                    if rest.is_empty() {
                        out.push(item.clone());
                    } else {
                        extract_tokens(item, rest, out);
                    }
                }
                return;
            }
            Value::Array(items) => token.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        };

        match next {
            Some(next) => current = next,
            None => return,
        }
    }

    out.push(current.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lru_eviction() {
        let mut extractor = JsonExtractor::with_capacity(2);
        extractor.compiled("$.a").unwrap();
        extractor.compiled("$.b").unwrap();
        extractor.compiled("$.a").unwrap();
        extractor.compiled("$.c").unwrap();

        let cached: Vec<_> = extractor.cached_paths().collect();
        assert_eq!(cached, vec!["$.a", "$.c"]);
        assert_eq!(extractor.hits(), 1);
        assert_eq!(extractor.misses(), 3);
    }

    #[test]
    fn test_invalid_path_not_cached() {
        let mut extractor = JsonExtractor::new();
        assert!(extractor.compiled("a.b").is_err());
        assert_eq!(extractor.cache_len(), 0);
    }

    #[test]
    fn test_nested_wildcards() {
        let doc = json!({ "rows": [ { "v": [1, 2] }, { "v": [3] }, { "w": 0 } ] });
        let mut out = Vec::new();
        let tokens: Vec<String> = ["rows", "*", "v", "*"].iter().map(|s| s.to_string()).collect();
        extract_tokens(&doc, &tokens, &mut out);
        assert_eq!(out, vec![json!(1), json!(2), json!(3)]);
    }
}
