//! Values produced by the binary structure decoder.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Result, SpeError};
use crate::types::primitive::Number;

/// One decoded field.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Scalar(Number),
    Sequence(Vec<Number>),
    /// A character block with leading and trailing NUL bytes removed.
    Text(String),
    Struct(DecodedStruct),
    StructArray(Vec<DecodedStruct>),
}

impl DecodedValue {
    pub fn as_number(&self) -> Option<Number> {
        match self {
            DecodedValue::Scalar(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Number]> {
        match self {
            DecodedValue::Sequence(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&DecodedStruct> {
        match self {
            DecodedValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_array(&self) -> Option<&[DecodedStruct]> {
        match self {
            DecodedValue::StructArray(items) => Some(items),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Scalar(_) => "scalar",
            DecodedValue::Sequence(_) => "sequence",
            DecodedValue::Text(_) => "text",
            DecodedValue::Struct(_) => "struct",
            DecodedValue::StructArray(_) => "struct array",
        }
    }
}

/// A decoded structure: field values in schema order, looked up by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedStruct {
    fields: Vec<(&'static str, DecodedValue)>,
}

impl DecodedStruct {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &'static str, value: DecodedValue) {
        self.fields.push((name, value));
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DecodedValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    /// Like [`get`](Self::get), but a missing field is an error.
    pub fn field(&self, name: &str) -> Result<&DecodedValue> {
        self.get(name)
            .ok_or_else(|| SpeError::Format(format!("decoded structure has no field `{name}`")))
    }

    pub fn scalar(&self, name: &str) -> Result<Number> {
        let value = self.field(name)?;
        value.as_number().ok_or_else(|| mismatch(name, "scalar", value))
    }

    /// A scalar field that must hold a non-negative integer.
    pub fn unsigned(&self, name: &str) -> Result<u64> {
        let number = self.scalar(name)?;
        number.as_u64().ok_or_else(|| {
            SpeError::Format(format!(
                "field `{name}` should be a non-negative integer, found {number:?}"
            ))
        })
    }

    pub fn sequence(&self, name: &str) -> Result<&[Number]> {
        let value = self.field(name)?;
        value.as_sequence().ok_or_else(|| mismatch(name, "sequence", value))
    }

    pub fn text(&self, name: &str) -> Result<&str> {
        let value = self.field(name)?;
        value.as_text().ok_or_else(|| mismatch(name, "text", value))
    }

    pub fn structure(&self, name: &str) -> Result<&DecodedStruct> {
        let value = self.field(name)?;
        value.as_struct().ok_or_else(|| mismatch(name, "struct", value))
    }

    pub fn structures(&self, name: &str) -> Result<&[DecodedStruct]> {
        let value = self.field(name)?;
        value
            .as_struct_array()
            .ok_or_else(|| mismatch(name, "struct array", value))
    }

    /// Pretty JSON rendering, fields in schema order.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SpeError::Format(format!("cannot render decoded structure: {e}")))
    }
}

fn mismatch(name: &str, expected: &str, found: &DecodedValue) -> SpeError {
    SpeError::Format(format!(
        "field `{name}` should be a {expected}, found a {}",
        found.kind()
    ))
}

impl Serialize for DecodedStruct {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
