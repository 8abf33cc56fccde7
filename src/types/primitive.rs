//! Primitive element types shared by every decoder in the crate.
//!
//! The numeric datatype codes stored in binary headers and the pixel type
//! names used by the XML footer are both resolved through [`TYPE_TABLE`],
//! so the two vocabularies cannot drift apart.

use serde::Serialize;
use winnow::binary::{
    le_f32, le_f64, le_i8, le_i16, le_i32, le_i64, le_u8, le_u16, le_u32, le_u64,
};
use winnow::error::ContextError;

use crate::error::{Result, SpeError};

/// A fixed-width element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveTag {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    /// One byte of a character block. Arrays of `Char` decode to text.
    Char,
}

struct TypeEntry {
    tag: PrimitiveTag,
    code: Option<i64>,
    names: &'static [&'static str],
}

static TYPE_TABLE: &[TypeEntry] = &[
    TypeEntry { tag: PrimitiveTag::F32, code: Some(0), names: &["MonochromeFloating32"] },
    TypeEntry { tag: PrimitiveTag::I32, code: Some(1), names: &["MonochromeUnsigned32"] },
    TypeEntry { tag: PrimitiveTag::I16, code: Some(2), names: &[] },
    TypeEntry { tag: PrimitiveTag::U16, code: Some(3), names: &["MonochromeUnsigned16"] },
    TypeEntry { tag: PrimitiveTag::F64, code: Some(5), names: &["Double"] },
    TypeEntry { tag: PrimitiveTag::U8, code: Some(6), names: &[] },
    TypeEntry { tag: PrimitiveTag::U32, code: Some(8), names: &[] },
    TypeEntry { tag: PrimitiveTag::I64, code: None, names: &["Int64"] },
];

/// Highest datatype code the legacy (WinSpec) frame layout accepts.
const LEGACY_MAX_CODE: i64 = 3;

impl PrimitiveTag {
    /// Width of one element in bytes.
    pub const fn width(self) -> usize {
        match self {
            PrimitiveTag::I8 | PrimitiveTag::U8 | PrimitiveTag::Char => 1,
            PrimitiveTag::I16 | PrimitiveTag::U16 => 2,
            PrimitiveTag::I32 | PrimitiveTag::U32 | PrimitiveTag::F32 => 4,
            PrimitiveTag::I64 | PrimitiveTag::U64 | PrimitiveTag::F64 => 8,
        }
    }

    /// Whether arrays of this tag collapse to text rather than numbers.
    pub const fn is_text(self) -> bool {
        matches!(self, PrimitiveTag::Char)
    }

    /// Looks up a numeric datatype code from a binary header.
    pub fn from_code(code: i64) -> Result<Self> {
        TYPE_TABLE
            .iter()
            .find(|entry| entry.code == Some(code))
            .map(|entry| entry.tag)
            .ok_or_else(|| SpeError::UnknownType(format!("datatype code {code}")))
    }

    /// Looks up a datatype code, restricted to the set the legacy frame
    /// layout supports (float32, int32, int16, uint16).
    pub fn from_legacy_code(code: i64) -> Result<Self> {
        if !(0..=LEGACY_MAX_CODE).contains(&code) {
            return Err(SpeError::UnknownType(format!(
                "legacy datatype code {code} (supported: 0..={LEGACY_MAX_CODE})"
            )));
        }
        Self::from_code(code)
    }

    /// Looks up a type name from the XML footer (`pixelFormat` or a
    /// metadata element's `type`).
    pub fn from_name(name: &str) -> Result<Self> {
        TYPE_TABLE
            .iter()
            .find(|entry| entry.names.contains(&name))
            .map(|entry| entry.tag)
            .ok_or_else(|| SpeError::UnknownType(format!("type name `{name}`")))
    }

    /// The numeric datatype code for this tag, if it has one.
    pub fn code(self) -> Option<i64> {
        TYPE_TABLE
            .iter()
            .find(|entry| entry.tag == self)
            .and_then(|entry| entry.code)
    }

    /// Decodes a single little-endian element.
    ///
    /// `Char` decodes as its raw byte value; text collapsing happens one
    /// level up, where the element count is known.
    pub(crate) fn decode(self, input: &mut &[u8]) -> std::result::Result<Number, ContextError> {
        match self {
            PrimitiveTag::I8 => le_i8(input).map(|v| Number::Int(v.into())),
            PrimitiveTag::U8 | PrimitiveTag::Char => le_u8(input).map(|v| Number::UInt(v.into())),
            PrimitiveTag::I16 => le_i16(input).map(|v| Number::Int(v.into())),
            PrimitiveTag::U16 => le_u16(input).map(|v| Number::UInt(v.into())),
            PrimitiveTag::I32 => le_i32(input).map(|v| Number::Int(v.into())),
            PrimitiveTag::U32 => le_u32(input).map(|v| Number::UInt(v.into())),
            PrimitiveTag::I64 => le_i64(input).map(Number::Int),
            PrimitiveTag::U64 => le_u64(input).map(Number::UInt),
            PrimitiveTag::F32 => le_f32(input).map(|v| Number::Float(v.into())),
            PrimitiveTag::F64 => le_f64(input).map(Number::Float),
        }
    }
}

/// A decoded scalar, widened to the largest type of its family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::UInt(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// Integer value, or `None` for floats and out-of-range values.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(v) => Some(v),
            Number::UInt(v) => i64::try_from(v).ok(),
            Number::Float(_) => None,
        }
    }

    /// Non-negative integer value, or `None`.
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Number::Int(v) => u64::try_from(v).ok(),
            Number::UInt(v) => Some(v),
            Number::Float(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_has_a_non_zero_width() {
        let tags = [
            PrimitiveTag::I8,
            PrimitiveTag::U8,
            PrimitiveTag::I16,
            PrimitiveTag::U16,
            PrimitiveTag::I32,
            PrimitiveTag::U32,
            PrimitiveTag::I64,
            PrimitiveTag::U64,
            PrimitiveTag::F32,
            PrimitiveTag::F64,
            PrimitiveTag::Char,
        ];
        for tag in tags {
            assert!(tag.width() > 0, "{tag:?}");
            assert_eq!(tag.is_text(), tag == PrimitiveTag::Char);
        }
    }

    #[test]
    fn codes_and_names_resolve_to_the_same_tags() {
        assert_eq!(PrimitiveTag::from_code(0).unwrap(), PrimitiveTag::F32);
        assert_eq!(
            PrimitiveTag::from_name("MonochromeFloating32").unwrap(),
            PrimitiveTag::F32
        );
        assert_eq!(PrimitiveTag::from_code(3).unwrap(), PrimitiveTag::U16);
        assert_eq!(
            PrimitiveTag::from_name("MonochromeUnsigned16").unwrap(),
            PrimitiveTag::U16
        );
        assert_eq!(
            PrimitiveTag::from_name("MonochromeUnsigned32").unwrap(),
            PrimitiveTag::from_code(1).unwrap()
        );
        assert_eq!(PrimitiveTag::from_name("Int64").unwrap(), PrimitiveTag::I64);
        assert_eq!(PrimitiveTag::from_name("Double").unwrap(), PrimitiveTag::F64);
        assert_eq!(PrimitiveTag::from_code(6).unwrap(), PrimitiveTag::U8);
        assert_eq!(PrimitiveTag::from_code(8).unwrap(), PrimitiveTag::U32);
        assert_eq!(PrimitiveTag::U16.code(), Some(3));
        assert_eq!(PrimitiveTag::I64.code(), None);
    }

    #[test]
    fn unknown_codes_and_names_are_errors() {
        assert!(matches!(
            PrimitiveTag::from_code(4),
            Err(SpeError::UnknownType(_))
        ));
        assert!(matches!(
            PrimitiveTag::from_name("MonochromeUnsigned12"),
            Err(SpeError::UnknownType(_))
        ));
    }

    #[test]
    fn legacy_codes_are_a_closed_subset() {
        assert_eq!(PrimitiveTag::from_legacy_code(2).unwrap(), PrimitiveTag::I16);
        assert!(matches!(
            PrimitiveTag::from_legacy_code(5),
            Err(SpeError::UnknownType(_))
        ));
        assert!(matches!(
            PrimitiveTag::from_legacy_code(-1),
            Err(SpeError::UnknownType(_))
        ));
    }

    #[test]
    fn decodes_little_endian_values() {
        let bytes = [0xfe, 0xff, 0x00, 0x00, 0x80, 0x3f];
        let mut input = &bytes[..];
        assert_eq!(
            PrimitiveTag::I16.decode(&mut input).unwrap(),
            Number::Int(-2)
        );
        assert_eq!(
            PrimitiveTag::F32.decode(&mut input).unwrap(),
            Number::Float(1.0)
        );
        assert!(input.is_empty());
    }

    #[test]
    fn number_conversions() {
        assert_eq!(Number::Int(-1).as_u64(), None);
        assert_eq!(Number::UInt(7).as_i64(), Some(7));
        assert_eq!(Number::Float(2.5).as_i64(), None);
        assert_eq!(Number::UInt(3).as_f64(), 3.0);
    }
}
