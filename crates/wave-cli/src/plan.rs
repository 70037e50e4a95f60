//! Plan files: ordered stages with their declared output schemas

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use wave_compile::StageDef;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML plan: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON plan: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plan has no stages")]
    Empty,
}

/// Stages in producer-before-consumer order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub stages: Vec<StageDef>,
}

impl Plan {
    /// Load a plan; `.json` files are read as JSON, anything else as YAML
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, PlanError> {
        let plan: Plan = serde_yaml::from_str(contents)?;
        plan.validated()
    }

    pub fn from_json(contents: &str) -> Result<Self, PlanError> {
        let plan: Plan = serde_json::from_str(contents)?;
        plan.validated()
    }

    fn validated(self) -> Result<Self, PlanError> {
        if self.stages.is_empty() {
            return Err(PlanError::Empty);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_ir::Type;

    const ORDERS: &str = r#"
stages:
  - name: scan
    output:
      row:
        - name: order_id
          type: bigint
        - name: items
          type:
            array: varchar
  - name: project
    output:
      row:
        - name: order_id
          type: bigint
        - name: total
          type: double
"#;

    #[test]
    fn test_yaml_plan() {
        let plan = Plan::from_yaml(ORDERS).unwrap();
        assert_eq!(plan.stages.len(), 2);
        assert_eq!(plan.stages[0].name, "scan");

        let expected = Type::row([
            ("order_id", Type::BigInt.into_ptr()),
            ("items", Type::array(Type::Varchar.into_ptr())),
        ]);
        assert_eq!(plan.stages[0].output, expected);
    }

    #[test]
    fn test_json_plan() {
        let plan = Plan::from_json(
            r#"{ "stages": [ { "name": "s", "output": { "row": [ { "name": "a", "type": "integer" } ] } } ] }"#,
        )
        .unwrap();
        assert_eq!(plan.stages[0].output.to_string(), "ROW<a:INTEGER>");
    }

    #[test]
    fn test_empty_plan_rejected() {
        assert!(matches!(Plan::from_yaml("stages: []"), Err(PlanError::Empty)));
    }
}
