//! Type system for wave IR

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Shared handle to an immutable type tree
pub type TypePtr = Arc<Type>;

/// Fieldless tag of a [`Type`], used for dispatch during schema walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Varchar,
    Varbinary,
    Date,
    Timestamp,
    Row,
    Array,
    Map,
}

/// Logical type of a column
///
/// Scalars are unit variants. `Array` and `Map` exist so plans can describe them,
/// but the operand resolution walk does not flatten them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    // Primitives
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,

    // Text / binary
    Varchar,
    Varbinary,

    // Temporal
    Date,
    Timestamp,

    // Complex
    Row(RowType),
    Array(TypePtr),
    Map { key: TypePtr, value: TypePtr },
}

impl Type {
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Boolean => TypeKind::Boolean,
            Type::TinyInt => TypeKind::TinyInt,
            Type::SmallInt => TypeKind::SmallInt,
            Type::Integer => TypeKind::Integer,
            Type::BigInt => TypeKind::BigInt,
            Type::Real => TypeKind::Real,
            Type::Double => TypeKind::Double,
            Type::Varchar => TypeKind::Varchar,
            Type::Varbinary => TypeKind::Varbinary,
            Type::Date => TypeKind::Date,
            Type::Timestamp => TypeKind::Timestamp,
            Type::Row(_) => TypeKind::Row,
            Type::Array(_) => TypeKind::Array,
            Type::Map { .. } => TypeKind::Map,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Type::Row(_) | Type::Array(_) | Type::Map { .. })
    }

    pub fn is_row(&self) -> bool {
        matches!(self, Type::Row(_))
    }

    pub fn is_nested_container(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Map { .. })
    }

    pub fn as_row(&self) -> Option<&RowType> {
        match self {
            Type::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn into_ptr(self) -> TypePtr {
        Arc::new(self)
    }

    /// Build a row type from `(name, type)` pairs in declaration order
    pub fn row<I, S>(fields: I) -> TypePtr
    where
        I: IntoIterator<Item = (S, TypePtr)>,
        S: Into<String>,
    {
        Arc::new(Type::Row(RowType::new(fields)))
    }

    pub fn array(element: TypePtr) -> TypePtr {
        Arc::new(Type::Array(element))
    }

    pub fn map(key: TypePtr, value: TypePtr) -> TypePtr {
        Arc::new(Type::Map { key, value })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Boolean => f.write_str("BOOLEAN"),
            Type::TinyInt => f.write_str("TINYINT"),
            Type::SmallInt => f.write_str("SMALLINT"),
            Type::Integer => f.write_str("INTEGER"),
            Type::BigInt => f.write_str("BIGINT"),
            Type::Real => f.write_str("REAL"),
            Type::Double => f.write_str("DOUBLE"),
            Type::Varchar => f.write_str("VARCHAR"),
            Type::Varbinary => f.write_str("VARBINARY"),
            Type::Date => f.write_str("DATE"),
            Type::Timestamp => f.write_str("TIMESTAMP"),
            Type::Row(row) => {
                f.write_str("ROW<")?;
                for (i, field) in row.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}:{}", field.name, field.ty)?;
                }
                f.write_str(">")
            }
            Type::Array(element) => write!(f, "ARRAY<{}>", element),
            Type::Map { key, value } => write!(f, "MAP<{},{}>", key, value),
        }
    }
}

/// Named child of a row. Names may repeat, positions may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypePtr,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypePtr) -> Self {
        Self { name: name.into(), ty }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowType {
    fields: Vec<Field>,
}

impl RowType {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, TypePtr)>,
        S: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, ty)| Field::new(name, ty))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn child_at(&self, index: usize) -> Option<&TypePtr> {
        self.fields.get(index).map(|f| &f.ty)
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.name.as_str())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let ty = Type::row([
            ("a", Type::Integer.into_ptr()),
            ("tags", Type::array(Type::Varchar.into_ptr())),
            (
                "attrs",
                Type::map(Type::Varchar.into_ptr(), Type::BigInt.into_ptr()),
            ),
        ]);
        assert_eq!(
            ty.to_string(),
            "ROW<a:INTEGER,tags:ARRAY<VARCHAR>,attrs:MAP<VARCHAR,BIGINT>>"
        );
    }

    #[test]
    fn test_kind_classification() {
        assert!(Type::Double.is_scalar());
        assert_eq!(Type::Double.kind(), TypeKind::Double);

        let row = Type::row([("x", Type::Integer.into_ptr())]);
        assert!(row.is_row());
        assert!(!row.is_scalar());
        assert!(!row.is_nested_container());

        let arr = Type::array(Type::Integer.into_ptr());
        assert!(arr.is_nested_container());
        assert_eq!(arr.kind(), TypeKind::Array);
    }

    #[test]
    fn test_row_accessors_keep_duplicate_names() {
        let ty = Type::row([("a", Type::Integer.into_ptr()), ("a", Type::BigInt.into_ptr())]);
        let row = ty.as_row().unwrap();

        assert_eq!(row.len(), 2);
        assert_eq!(row.name_of(0), Some("a"));
        assert_eq!(row.name_of(1), Some("a"));
        assert_eq!(row.child_at(1).map(|t| t.kind()), Some(TypeKind::BigInt));
        assert!(row.child_at(2).is_none());
    }

    #[test]
    fn test_json_shape() {
        let ty = Type::row([
            ("a", Type::Integer.into_ptr()),
            ("b", Type::array(Type::BigInt.into_ptr())),
        ]);

        let json = serde_json::to_value(&*ty).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "row": [
                    { "name": "a", "type": "integer" },
                    { "name": "b", "type": { "array": "bigint" } }
                ]
            })
        );

        let parsed: Type = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, *ty);
    }
}
