//! Decoder configuration.

use bon::Builder;

/// Knobs controlling how strictly a file is validated while decoding.
///
/// ```
/// use spe::DecodeOptions;
///
/// let options = DecodeOptions::builder().strict_header(true).build();
/// assert!(options.strict_header);
/// assert!(options.verify_frame_stream);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct DecodeOptions {
    /// Fail instead of warn when the legacy header does not end exactly
    /// at the frame-stream start offset.
    #[builder(default = false)]
    pub strict_header: bool,

    /// Check that the frame decode plan consumes exactly the bytes
    /// between the frame-stream start and the XML footer before
    /// decoding any frame.
    #[builder(default = true)]
    pub verify_frame_stream: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
