pub mod config;
pub mod error;
pub mod logger;
pub mod parser;
pub mod processing;
pub mod spe_file;
pub mod types;
pub mod utils;

pub use config::DecodeOptions;
pub use error::{Result, SpeError};
pub use parser::{Frames, LegacyFrames};
pub use spe_file::{HybridFile, LegacyFile, SpeFile};
pub use types::{
    AcquisitionSettings, DecodedStruct, DecodedValue, Frame, FrameDecodePlan, Number, Pixels,
    PrimitiveTag, RegionData,
};
