use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Field id → current value for one form.
pub type FormData = BTreeMap<String, FieldValue>;

/// Reference to an uploaded receipt or invoice.
///
/// The bytes themselves live with the upload service; the form only keeps
/// enough metadata to show and re-submit the attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FileRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            mime: None,
        }
    }
}

/// The value held by a single field.
///
/// Serialized untagged so stored payloads look like plain JSON objects
/// (`{"monto": 150.5, "banco": "BBVA"}`). Numbers are written and read as
/// exact JSON decimals. An empty array reads back as an empty `List`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
    Number(#[serde(serialize_with = "serialize_number")] Decimal),
    List(Vec<String>),
    Files(Vec<FileRef>),
}

fn serialize_number<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serde_json::Number::from_str(&value.normalize().to_string())
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

fn parse_number(text: &str) -> Result<Decimal, String> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| format!("number {text} out of range: {e}"))
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        FieldValue::try_from(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

impl TryFrom<Value> for FieldValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(checked) => Ok(Self::Bool(checked)),
            Value::String(text) => Ok(Self::Text(text)),
            Value::Number(number) => parse_number(&number.to_string()).map(Self::Number),
            Value::Array(items) if items.iter().all(Value::is_string) => Ok(Self::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::Array(items) => serde_json::from_value(Value::Array(items))
                .map(Self::Files)
                .map_err(|e| e.to_string()),
            other => Err(format!("unsupported field value: {other}")),
        }
    }
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether the value counts as "not provided" for required checks.
    ///
    /// An unchecked checkbox is empty, so a required checkbox must be ticked.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bool(checked) => !checked,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Files(files) => files.is_empty(),
        }
    }

    /// Textual rendition used by length, digit and pattern rules.
    ///
    /// Returns `None` for values those rules do not apply to.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Number(number) => Some(Cow::Owned(number.normalize().to_string())),
            Self::Bool(_) | Self::List(_) | Self::Files(_) => None,
        }
    }

    /// Whether this (controlling) value satisfies a dependency's match value.
    ///
    /// Numbers compare numerically even when one side arrived as text, booleans
    /// accept `"true"`/`"false"`, and a multi-select matches when it contains
    /// the expected option.
    pub fn matches(&self, expected: &FieldValue) -> bool {
        match (self, expected) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Number(a), Self::Text(b)) | (Self::Text(b), Self::Number(a)) => {
                b.trim().parse::<Decimal>().is_ok_and(|parsed| parsed == *a)
            }
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Bool(a), Self::Text(b)) => b.parse::<bool>().is_ok_and(|parsed| parsed == *a),
            (Self::List(items), Self::Text(b)) => items.iter().any(|item| item == b),
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<FileRef>> for FieldValue {
    fn from(value: Vec<FileRef>) -> Self {
        Self::Files(value)
    }
}
