//! SPE file parsing functionality

pub mod cursor;
mod descriptor_parser;
mod header_parser;
pub mod pixel_parser;
mod struct_parser;

// Re-export the parsing functions
pub use cursor::ByteCursor;
pub use descriptor_parser::{parse_document, read_settings, resolve, resolve_document};
pub use header_parser::{
    legacy_geometry, parse_header_version, parse_header_with, parse_legacy_header,
    parse_sparse_header,
};
pub use pixel_parser::{Frames, LegacyFrames, decode_frame, decode_legacy_frame};
pub use struct_parser::decode_struct;
