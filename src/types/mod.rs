//! Type definitions for the SPE file formats

pub mod decoded;
pub mod descriptor;
pub mod header;
pub mod pixel_data;
pub mod plan;
pub mod primitive;
pub mod schema;
pub mod settings;

// Re-export the main types for convenience
pub use decoded::{DecodedStruct, DecodedValue};
pub use descriptor::{AttrValue, FrameDescriptor, MetadataFieldDescriptor, RegionDescriptor};
pub use header::{FrameGeometry, LEGACY_HEADER_SCHEMA, SparseHeader};
pub use pixel_data::{Frame, Pixels, RegionData};
pub use plan::{FrameDecodePlan, PlanEntry};
pub use primitive::{Number, PrimitiveTag};
pub use schema::{Element, FieldSpec, StructureSchema};
pub use settings::AcquisitionSettings;
