use schemars::{gen::SchemaSettings, JsonSchema};
use serde_json::{Map, Value};

/// A payload that does not match the shape it was validated against
///
/// `field` is the full path of the offending field (e.g. `books[3].title`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}`: expected {expected}")]
pub struct SchemaViolation {
    pub field: String,
    pub expected: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

/// A named structural contract for request or response content
pub trait Shape: Sized {
    /// Shape name used in logs and in the description sent to the model
    const NAME: &'static str;

    /// Validates `value` found at `path` into a typed instance
    fn from_value_at(value: &Value, path: &str) -> Result<Self, SchemaViolation>;

    /// Validates a top-level payload
    fn from_value(value: &Value) -> Result<Self, SchemaViolation> {
        Self::from_value_at(value, "")
    }
}

/// JSON Schema for `T` with every subschema inlined, as sent to the model
pub fn output_schema<T: JsonSchema>() -> serde_json::Result<Value> {
    let schema = SchemaSettings::draft07()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>();
    serde_json::to_value(schema)
}

/// Closed set of string labels accepted for an enum-like field
pub trait Variants: Sized + Copy + 'static {
    const VARIANTS: &'static [Self];

    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.label() == label)
    }

    fn labels() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(|v| v.label()).collect()
    }

    fn expected() -> String {
        let quoted: Vec<String> = Self::labels().iter().map(|l| format!("\"{l}\"")).collect();
        format!("one of {}", quoted.join(", "))
    }
}

/// Implements `serde::Deserialize` for shapes by routing through `Shape::from_value`,
/// so serde parsing and explicit validation can never disagree.
#[macro_export]
macro_rules! deserialize_via_shape {
    ($($ty:ty),+ $(,)?) => {$(
        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::models::Shape>::from_value(&value).map_err(serde::de::Error::custom)
            }
        }
    )+};
}

pub(crate) fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Field accessor over a JSON object found at `path`
///
/// Absent keys and explicit `null` are both treated as "missing".
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    pub fn of(value: &'a Value, path: &'a str) -> Result<Self, SchemaViolation> {
        match value {
            Value::Object(map) => Ok(Self { map, path }),
            _ => {
                let field = if path.is_empty() { "$" } else { path };
                Err(SchemaViolation::new(field, "object"))
            }
        }
    }

    fn path_of(&self, key: &str) -> String {
        join(self.path, key)
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn require(&self, key: &str, expected: &str) -> Result<&'a Value, SchemaViolation> {
        self.present(key)
            .ok_or_else(|| SchemaViolation::new(self.path_of(key), expected))
    }

    pub fn string(&self, key: &str) -> Result<String, SchemaViolation> {
        let value = self.require(key, "string")?;
        as_string(value).ok_or_else(|| SchemaViolation::new(self.path_of(key), "string"))
    }

    pub fn non_blank(&self, key: &str) -> Result<String, SchemaViolation> {
        let value = self.require(key, "non-empty string")?;
        as_string(value)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SchemaViolation::new(self.path_of(key), "non-empty string"))
    }

    pub fn opt_string(&self, key: &str) -> Result<Option<String>, SchemaViolation> {
        self.present(key)
            .map(|v| as_string(v).ok_or_else(|| SchemaViolation::new(self.path_of(key), "string")))
            .transpose()
    }

    pub fn strings(&self, key: &str) -> Result<Vec<String>, SchemaViolation> {
        let value = self.require(key, "list of strings")?;
        self.string_list(key, value)
    }

    pub fn non_empty_strings(&self, key: &str) -> Result<Vec<String>, SchemaViolation> {
        let list = self.strings(key)?;
        if list.is_empty() {
            return Err(SchemaViolation::new(
                self.path_of(key),
                "non-empty list of strings",
            ));
        }
        Ok(list)
    }

    pub fn opt_strings(&self, key: &str) -> Result<Option<Vec<String>>, SchemaViolation> {
        self.present(key)
            .map(|v| self.string_list(key, v))
            .transpose()
    }

    fn string_list(&self, key: &str, value: &Value) -> Result<Vec<String>, SchemaViolation> {
        let items = value
            .as_array()
            .ok_or_else(|| SchemaViolation::new(self.path_of(key), "list of strings"))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                as_string(item).ok_or_else(|| {
                    SchemaViolation::new(format!("{}[{i}]", self.path_of(key)), "string")
                })
            })
            .collect()
    }

    pub fn integer<T: TryFrom<i64>>(&self, key: &str) -> Result<T, SchemaViolation> {
        let value = self.require(key, "integer")?;
        as_integer(value).ok_or_else(|| SchemaViolation::new(self.path_of(key), "integer"))
    }

    pub fn opt_integer<T: TryFrom<i64>>(&self, key: &str) -> Result<Option<T>, SchemaViolation> {
        self.present(key)
            .map(|v| {
                as_integer(v).ok_or_else(|| SchemaViolation::new(self.path_of(key), "integer"))
            })
            .transpose()
    }

    pub fn opt_decimal(&self, key: &str) -> Result<Option<f64>, SchemaViolation> {
        self.present(key)
            .map(|v| as_decimal(v).ok_or_else(|| SchemaViolation::new(self.path_of(key), "decimal")))
            .transpose()
    }

    pub fn opt_bool(&self, key: &str) -> Result<Option<bool>, SchemaViolation> {
        self.present(key)
            .map(|v| as_bool(v).ok_or_else(|| SchemaViolation::new(self.path_of(key), "boolean")))
            .transpose()
    }

    pub fn variant<T: Variants>(&self, key: &str) -> Result<T, SchemaViolation> {
        let value = self.require(key, &T::expected())?;
        value
            .as_str()
            .and_then(T::from_label)
            .ok_or_else(|| SchemaViolation::new(self.path_of(key), T::expected()))
    }

    pub fn list_of<T: Shape>(&self, key: &str) -> Result<Vec<T>, SchemaViolation> {
        let expected = format!("list of {}", T::NAME);
        let value = self.require(key, &expected)?;
        let items = value
            .as_array()
            .ok_or_else(|| SchemaViolation::new(self.path_of(key), expected))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_value_at(item, &format!("{}[{i}]", self.path_of(key))))
            .collect()
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn as_integer<T: TryFrom<i64>>(value: &Value) -> Option<T> {
    let raw = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    T::try_from(raw).ok()
}

fn as_decimal(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    raw.is_finite().then_some(raw)
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse::<bool>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Color {
        Red,
        DarkBlue,
    }

    impl Variants for Color {
        const VARIANTS: &'static [Self] = &[Color::Red, Color::DarkBlue];

        fn label(&self) -> &'static str {
            match self {
                Color::Red => "red",
                Color::DarkBlue => "dark blue",
            }
        }
    }

    #[test]
    fn test_null_is_treated_as_missing() {
        let value = json!({ "name": null });
        let fields = Fields::of(&value, "").unwrap();

        assert_eq!(fields.opt_string("name").unwrap(), None);
        assert_eq!(
            fields.string("name").unwrap_err(),
            SchemaViolation::new("name", "string")
        );
    }

    #[test]
    fn test_numeric_strings_are_parsed() {
        let value = json!({ "rating": "4.25", "pages": " 320 " });
        let fields = Fields::of(&value, "").unwrap();

        assert_eq!(fields.opt_decimal("rating").unwrap(), Some(4.25));
        assert_eq!(fields.opt_integer::<u32>("pages").unwrap(), Some(320));
    }

    #[test]
    fn test_trailing_garbage_is_rejected_not_truncated() {
        let value = json!({ "rating": "4.5 stars", "pages": "320pp" });
        let fields = Fields::of(&value, "").unwrap();

        assert_eq!(fields.opt_decimal("rating").unwrap_err().field, "rating");
        assert_eq!(fields.opt_integer::<u32>("pages").unwrap_err().field, "pages");
    }

    #[test]
    fn test_numbers_are_not_stringified() {
        let value = json!({ "year": 1965 });
        let fields = Fields::of(&value, "").unwrap();

        assert!(fields.string("year").is_err());
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        let value = json!({ "pages": -12 });
        let fields = Fields::of(&value, "").unwrap();

        assert!(fields.opt_integer::<u32>("pages").is_err());
    }

    #[test]
    fn test_variant_outside_allowed_set() {
        let value = json!({ "color": "green" });
        let fields = Fields::of(&value, "book").unwrap();

        let err = fields.variant::<Color>("color").unwrap_err();
        assert_eq!(err.field, "book.color");
        assert_eq!(err.expected, "one of \"red\", \"dark blue\"");
    }

    #[test]
    fn test_list_item_path() {
        let value = json!({ "tags": ["a", 2] });
        let fields = Fields::of(&value, "").unwrap();

        assert_eq!(fields.strings("tags").unwrap_err().field, "tags[1]");
    }

    #[test]
    fn test_non_object_root() {
        let err = Fields::of(&json!([1, 2]), "").err().unwrap();
        assert_eq!(err.field, "$");
        assert_eq!(err.expected, "object");
    }
}
