//! Layout descriptors read from the LightField XML footer.

use bon::Builder;
use serde::Serialize;

use crate::error::Result;
use crate::types::primitive::PrimitiveTag;

/// An XML attribute value, typed on read: integers when they parse,
/// otherwise the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Text(String),
}

impl AttrValue {
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse()
            .map(AttrValue::Int)
            .unwrap_or_else(|_| AttrValue::Text(raw.to_string()))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(v) => Some(*v),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Int(_) => None,
        }
    }
}

/// A `DataBlock type="Frame"` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
pub struct FrameDescriptor {
    /// How many consecutive frames share this layout.
    pub count: u64,
    pub byte_size: u64,
    pub byte_stride: Option<u64>,
    /// `metaFormat` split on commas, in order.
    #[builder(default)]
    pub metadata_format_ids: Vec<String>,
    pub pixel_type_name: String,
    pub calibrations: Option<String>,
}

impl FrameDescriptor {
    pub fn pixel_type(&self) -> Result<PrimitiveTag> {
        PrimitiveTag::from_name(&self.pixel_type_name)
    }
}

/// A `DataBlock type="Region"` element nested in a frame block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
pub struct RegionDescriptor {
    pub width: usize,
    pub height: usize,
    pub byte_size: u64,
    pub byte_stride: Option<u64>,
    pub calibrations: Option<String>,
}

/// One child element of a `MetaBlock`, describing a per-frame value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
pub struct MetadataFieldDescriptor {
    /// Element name, e.g. `TimeStamp` or `FrameTrackingNumber`.
    #[builder(into)]
    pub tag_name: String,
    #[builder(into)]
    pub type_name: String,
    pub bit_depth: Option<i64>,
    /// The remaining attributes of this element's schema, in schema order.
    #[builder(default)]
    pub attributes: Vec<(String, AttrValue)>,
}

impl MetadataFieldDescriptor {
    pub fn primitive(&self) -> Result<PrimitiveTag> {
        PrimitiveTag::from_name(&self.type_name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}
