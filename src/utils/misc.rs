//! Format constants shared by the SPE readers.

/// Size of the fixed binary header of both variants; frame data follows it.
pub const LEGACY_HEADER_SIZE: usize = 4100;

/// Where the binary frame stream begins.
pub const FRAME_STREAM_OFFSET: usize = 4100;

/// Headers reporting at least this version carry an XML footer.
pub const HYBRID_HEADER_VERSION: f32 = 3.0;

// Absolute offsets of the fields read from a LightField header.
pub const X_DIM_DET_OFFSET: usize = 6;
pub const Y_DIM_DET_OFFSET: usize = 18;
pub const NOSCAN_OFFSET: usize = 34;
pub const XDIM_OFFSET: usize = 42;
pub const DATATYPE_OFFSET: usize = 108;
pub const YDIM_OFFSET: usize = 656;
pub const SCRAMBLE_OFFSET: usize = 658;
pub const LNOSCAN_OFFSET: usize = 664;
pub const XML_FOOTER_OFFSET_OFFSET: usize = 678;
pub const NUM_FRAMES_OFFSET: usize = 1446;
pub const FILE_HEADER_VER_OFFSET: usize = 1992;
pub const WINVIEW_ID_OFFSET: usize = 2996;
pub const LAST_VALUE_OFFSET: usize = 4098;
