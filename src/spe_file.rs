use std::cell::OnceCell;
use std::path::Path;

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::config::DecodeOptions;
use crate::error::{Result, SpeError};
use crate::parser::{
    Frames, LegacyFrames, legacy_geometry, parse_document, parse_header_version,
    parse_legacy_header, parse_sparse_header, read_settings, resolve,
};
use crate::processing;
use crate::types::{
    AcquisitionSettings, DecodedStruct, Frame, FrameDecodePlan, FrameGeometry, PrimitiveTag,
    SparseHeader,
};
use crate::utils::file_utils::DataSource;
use crate::utils::misc::{FRAME_STREAM_OFFSET, HYBRID_HEADER_VERSION};

/// Computes a cached value once; errors are returned and not cached.
fn memoized<'c, T>(cell: &'c OnceCell<T>, init: impl FnOnce() -> Result<T>) -> Result<&'c T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

/// A WinSpec (SPE 2.x) file: fixed 4100-byte header, then fixed-size frames.
#[derive(Debug)]
pub struct LegacyFile {
    data: DataSource,
    header: DecodedStruct,
    x_axis: OnceCell<Vec<f64>>,
    y_axis: OnceCell<Vec<f64>>,
}

impl LegacyFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = Self::from_source(DataSource::open(path)?, options)?;
        info!(path = %path.display(), "opened legacy SPE file");
        Ok(file)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with(bytes, DecodeOptions::default())
    }

    pub fn from_bytes_with(bytes: Vec<u8>, options: DecodeOptions) -> Result<Self> {
        Self::from_source(DataSource::from(bytes), options)
    }

    fn from_source(data: DataSource, options: DecodeOptions) -> Result<Self> {
        let header = parse_legacy_header(&data, &options)?;
        Ok(Self {
            data,
            header,
            x_axis: OnceCell::new(),
            y_axis: OnceCell::new(),
        })
    }

    /// The decoded header; fields are looked up by their WinSpec names.
    pub fn header(&self) -> &DecodedStruct {
        &self.header
    }

    /// Frame dimensions, count and pixel type.
    ///
    /// Fails with [`SpeError::UnknownType`] when `datatype` is outside the
    /// set the legacy layout supports.
    pub fn geometry(&self) -> Result<FrameGeometry> {
        legacy_geometry(&self.header)
    }

    pub fn frame_width(&self) -> Result<usize> {
        Ok(self.header.unsigned("xdim")? as usize)
    }

    pub fn frame_height(&self) -> Result<usize> {
        Ok(self.header.unsigned("ydim")? as usize)
    }

    pub fn n_frames(&self) -> Result<usize> {
        Ok(self.header.unsigned("NumFrames")? as usize)
    }

    pub fn pixel_type(&self) -> Result<PrimitiveTag> {
        Ok(self.geometry()?.pixel_type)
    }

    /// Exposure time per frame, in seconds.
    pub fn exposure_time(&self) -> Result<f64> {
        Ok(self.header.scalar("exp_sec")?.as_f64())
    }

    /// Calibrated x axis, one value per column.
    pub fn x_axis(&self) -> Result<&[f64]> {
        memoized(&self.x_axis, || {
            processing::polynomial_axis(
                self.header.structure("x_calibration")?,
                self.frame_width()?,
            )
        })
        .map(Vec::as_slice)
    }

    /// Calibrated y axis, one value per row.
    pub fn y_axis(&self) -> Result<&[f64]> {
        memoized(&self.y_axis, || {
            processing::polynomial_axis(
                self.header.structure("y_calibration")?,
                self.frame_height()?,
            )
        })
        .map(Vec::as_slice)
    }

    pub fn x_label(&self) -> Result<&str> {
        self.header.structure("x_calibration")?.text("string")
    }

    pub fn y_label(&self) -> Result<&str> {
        self.header.structure("y_calibration")?.text("string")
    }

    /// Start time of every frame: `index * exp_sec`.
    pub fn elapsed_times(&self) -> Result<Vec<f64>> {
        Ok(processing::elapsed_times(
            self.n_frames()?,
            self.exposure_time()?,
        ))
    }

    /// Lazy sequence of frames, each holding one full-sensor region.
    pub fn frames(&self) -> Result<LegacyFrames<'_>> {
        let geometry = self.geometry()?;
        debug!(?geometry, "reading legacy frames");
        Ok(LegacyFrames::new(&self.data, geometry))
    }

    /// Decodes every frame concurrently. Frames are returned in file order.
    #[cfg(feature = "parallel")]
    pub fn frames_parallel(&self) -> Result<Vec<Frame>> {
        use crate::parser::{ByteCursor, decode_legacy_frame};
        use rayon::prelude::*;

        let geometry = self.geometry()?;
        if geometry.stream_end(FRAME_STREAM_OFFSET).is_none() {
            return Err(SpeError::Format(format!(
                "{} frames of {} bytes overflow the address space",
                geometry.frame_count,
                geometry.frame_bytes()
            )));
        }
        let frame_bytes = geometry.frame_bytes();
        let data: &[u8] = &self.data;

        (0..geometry.frame_count)
            .into_par_iter()
            .map(|index| {
                let mut cursor = ByteCursor::at(data, FRAME_STREAM_OFFSET + index * frame_bytes);
                decode_legacy_frame(&geometry, &mut cursor)
            })
            .collect()
    }

    /// The header as pretty JSON, fields in header order.
    pub fn header_json(&self) -> Result<String> {
        self.header.to_json()
    }
}

/// A LightField (SPE 3.x) file: sparse header, frame stream, XML footer.
#[derive(Debug)]
pub struct HybridFile {
    data: DataSource,
    options: DecodeOptions,
    header: SparseHeader,
    plan: OnceCell<FrameDecodePlan>,
    settings: OnceCell<AcquisitionSettings>,
}

impl HybridFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = Self::from_source(DataSource::open(path)?, options)?;
        info!(path = %path.display(), "opened LightField SPE file");
        Ok(file)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with(bytes, DecodeOptions::default())
    }

    pub fn from_bytes_with(bytes: Vec<u8>, options: DecodeOptions) -> Result<Self> {
        Self::from_source(DataSource::from(bytes), options)
    }

    fn from_source(data: DataSource, options: DecodeOptions) -> Result<Self> {
        let header = parse_sparse_header(&data)?;
        Ok(Self {
            data,
            options,
            header,
            plan: OnceCell::new(),
            settings: OnceCell::new(),
        })
    }

    pub fn sparse_header(&self) -> &SparseHeader {
        &self.header
    }

    pub fn frame_width(&self) -> usize {
        self.header.xdim.into()
    }

    pub fn frame_height(&self) -> usize {
        self.header.ydim.into()
    }

    fn footer_offset(&self) -> Result<usize> {
        let offset = usize::try_from(self.header.xml_footer_offset).map_err(|_| {
            SpeError::Format(format!(
                "XML footer offset {} is not addressable",
                self.header.xml_footer_offset
            ))
        })?;
        if offset < FRAME_STREAM_OFFSET {
            return Err(SpeError::Format(format!(
                "XML footer offset {offset} lies inside the header"
            )));
        }
        Ok(offset)
    }

    /// The XML footer, with trailing NUL bytes and whitespace removed.
    pub fn footer_text(&self) -> Result<&str> {
        let offset = self.footer_offset()?;
        let bytes = self.data.get(offset..).ok_or(SpeError::TruncatedData {
            offset,
            field: "xml_footer".into(),
            expected: 1,
            available: 0,
        })?;
        let text = std::str::from_utf8(bytes)
            .map_err(|e| SpeError::Format(format!("XML footer is not UTF-8: {e}")))?;
        Ok(text.trim_end_matches(|c: char| c == '\0' || c.is_whitespace()))
    }

    /// The frame decode plan described by the footer, resolved once.
    pub fn plan(&self) -> Result<&FrameDecodePlan> {
        memoized(&self.plan, || resolve(self.footer_text()?))
    }

    /// Acquisition settings recorded in the footer, read once.
    pub fn settings(&self) -> Result<&AcquisitionSettings> {
        memoized(&self.settings, || {
            Ok(read_settings(&parse_document(self.footer_text()?)?))
        })
    }

    /// Frame count of the first frame block.
    pub fn n_frames(&self) -> Result<u64> {
        Ok(self
            .plan()?
            .entries()
            .first()
            .map_or(0, |entry| entry.frame.count))
    }

    /// Pixel type of the first frame block.
    pub fn pixel_type(&self) -> Result<PrimitiveTag> {
        self.plan()?
            .entries()
            .first()
            .ok_or_else(|| SpeError::Format("footer describes no frame blocks".into()))?
            .frame
            .pixel_type()
    }

    /// Compares the bytes the plan consumes with the bytes between the
    /// frame-stream start and the footer.
    fn verify_stream(&self, plan: &FrameDecodePlan) -> Result<()> {
        let declared = (self.footer_offset()? - FRAME_STREAM_OFFSET) as u64;
        let planned = plan.stream_len()?;
        if planned == declared {
            return Ok(());
        }
        if self.options.verify_frame_stream {
            return Err(SpeError::Format(format!(
                "frame decode plan consumes {planned} bytes, frame stream holds {declared}"
            )));
        }
        warn!(planned, declared, "frame decode plan does not match the frame stream");
        Ok(())
    }

    /// Lazy sequence of frames in plan order.
    pub fn frames(&self) -> Result<Frames<'_>> {
        let plan = self.plan()?;
        self.verify_stream(plan)?;
        Ok(Frames::new(&self.data, plan))
    }

    /// Column names of the first frame block's metadata.
    pub fn metadata_columns(&self) -> Result<Vec<String>> {
        Ok(self
            .plan()?
            .entries()
            .first()
            .map(|entry| processing::metadata_column_names(&entry.metadata))
            .unwrap_or_default())
    }

    /// Per-frame metadata as a table, one row per frame.
    pub fn metadata_table(&self) -> Result<DataFrame> {
        let first_block = usize::try_from(self.n_frames()?).unwrap_or(usize::MAX);
        processing::metadata_table(&self.metadata_columns()?, self.frames()?.take(first_block))
    }
}

/// Either SPE variant, told apart by the header version.
#[derive(Debug)]
pub enum SpeFile {
    Legacy(LegacyFile),
    Hybrid(HybridFile),
}

impl SpeFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DecodeOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = DataSource::open(path)?;
        let file = Self::from_source(data, options)?;
        info!(path = %path.display(), hybrid = file.is_hybrid(), "opened SPE file");
        Ok(file)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with(bytes, DecodeOptions::default())
    }

    pub fn from_bytes_with(bytes: Vec<u8>, options: DecodeOptions) -> Result<Self> {
        Self::from_source(DataSource::from(bytes), options)
    }

    fn from_source(data: DataSource, options: DecodeOptions) -> Result<Self> {
        let version = parse_header_version(&data)?;
        debug!(version, "SPE header version");
        if version >= HYBRID_HEADER_VERSION {
            HybridFile::from_source(data, options).map(SpeFile::Hybrid)
        } else {
            LegacyFile::from_source(data, options).map(SpeFile::Legacy)
        }
    }

    pub fn is_hybrid(&self) -> bool {
        matches!(self, SpeFile::Hybrid(_))
    }

    pub fn frame_width(&self) -> Result<usize> {
        match self {
            SpeFile::Legacy(file) => file.frame_width(),
            SpeFile::Hybrid(file) => Ok(file.frame_width()),
        }
    }

    pub fn frame_height(&self) -> Result<usize> {
        match self {
            SpeFile::Legacy(file) => file.frame_height(),
            SpeFile::Hybrid(file) => Ok(file.frame_height()),
        }
    }

    /// Lazy frame sequence of either variant.
    pub fn frames(&self) -> Result<Box<dyn Iterator<Item = Result<Frame>> + '_>> {
        Ok(match self {
            SpeFile::Legacy(file) => Box::new(file.frames()?),
            SpeFile::Hybrid(file) => Box::new(file.frames()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::primitive::Number;
    use crate::utils::misc::*;

    fn put(bytes: &mut [u8], offset: usize, value: &[u8]) {
        bytes[offset..offset + value.len()].copy_from_slice(value);
    }

    const FOOTER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SpeFormat version="3.0" xmlns="http://www.princetoninstruments.com/spe/2009">
  <DataFormat>
    <DataBlock type="Frame" count="2" pixelFormat="MonochromeUnsigned16" size="16" stride="24" metaFormat="1">
      <DataBlock type="Region" count="1" width="4" height="2" size="16" stride="16"/>
    </DataBlock>
  </DataFormat>
  <MetaFormat>
    <MetaBlock id="1">
      <TimeStamp event="ExposureStarted" type="Int64" bitDepth="64" resolution="1000000" absoluteTime="2014-01-01T00:00:00Z"/>
    </MetaBlock>
  </MetaFormat>
  <DataHistories><DataHistory><Origin><Experiment><Devices><Cameras><Camera>
    <ShutterTiming><ExposureTime>50</ExposureTime></ShutterTiming>
  </Camera></Cameras></Devices></Experiment></Origin></DataHistory></DataHistories>
</SpeFormat>"#;

    /// Two frames of 2x4 uint16 pixels, each followed by an int64 time stamp.
    fn hybrid_bytes(footer: &str) -> Vec<u8> {
        let mut bytes = vec![0u8; LEGACY_HEADER_SIZE];
        put(&mut bytes, FILE_HEADER_VER_OFFSET, &3.0f32.to_le_bytes());
        put(&mut bytes, XDIM_OFFSET, &4u16.to_le_bytes());
        put(&mut bytes, YDIM_OFFSET, &2u16.to_le_bytes());
        put(&mut bytes, DATATYPE_OFFSET, &3i16.to_le_bytes());
        put(&mut bytes, NUM_FRAMES_OFFSET, &2i32.to_le_bytes());

        for frame in 0..2u16 {
            for pixel in 0..8u16 {
                bytes.extend_from_slice(&(frame * 100 + pixel).to_le_bytes());
            }
            bytes.extend_from_slice(&(1_000 * i64::from(frame)).to_le_bytes());
        }
        let footer_offset = bytes.len() as u64;
        put(&mut bytes, XML_FOOTER_OFFSET_OFFSET, &footer_offset.to_le_bytes());
        bytes.extend_from_slice(footer.as_bytes());
        bytes.extend_from_slice(b"\r\n\0\0");
        bytes
    }

    fn legacy_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; LEGACY_HEADER_SIZE];
        put(&mut bytes, 10, &0.5f32.to_le_bytes());
        put(&mut bytes, XDIM_OFFSET, &3u16.to_le_bytes());
        put(&mut bytes, YDIM_OFFSET, &1u16.to_le_bytes());
        put(&mut bytes, DATATYPE_OFFSET, &0i16.to_le_bytes());
        put(&mut bytes, NUM_FRAMES_OFFSET, &3i32.to_le_bytes());
        put(&mut bytes, FILE_HEADER_VER_OFFSET, &2.5f32.to_le_bytes());
        // x_calibration.string and polynom_order / polynom_coeff
        put(&mut bytes, 3018, b"Wavelength (nm)");
        put(&mut bytes, 3101, &[1]);
        put(&mut bytes, 3263, &500.0f64.to_le_bytes());
        put(&mut bytes, 3271, &0.25f64.to_le_bytes());
        for value in 0..9 {
            bytes.extend_from_slice(&(value as f32).to_le_bytes());
        }
        bytes
    }

    #[test]
    fn hybrid_file_reads_frames_and_metadata() {
        crate::logger::try_init();
        let file = HybridFile::from_bytes(hybrid_bytes(FOOTER)).unwrap();
        assert_eq!(file.sparse_header().file_header_ver, 3.0);
        assert_eq!((file.frame_width(), file.frame_height()), (4, 2));
        assert!(file.footer_text().unwrap().ends_with("</SpeFormat>"));
        assert_eq!(file.n_frames().unwrap(), 2);
        assert_eq!(file.pixel_type().unwrap(), PrimitiveTag::U16);

        let frames: Vec<Frame> = file.frames().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].regions[0].shape(), (2, 4));
        assert_eq!(frames[1].regions[0].get(1, 3), Some(Number::UInt(107)));
        assert_eq!(frames[1].metadata, vec![Number::Int(1_000)]);

        // The plan is resolved once and reused.
        assert!(std::ptr::eq(file.plan().unwrap(), file.plan().unwrap()));
    }

    #[test]
    fn hybrid_settings_and_metadata_table() {
        let file = HybridFile::from_bytes(hybrid_bytes(FOOTER)).unwrap();
        let settings = file.settings().unwrap();
        assert_eq!(settings.exposure_time_ms(), Some(50.0));
        assert_eq!(settings.exposure_started.as_deref(), Some("2014-01-01T00:00:00Z"));
        assert_eq!(settings.exposure_ended, None);

        let table = file.metadata_table().unwrap();
        assert_eq!(table.shape(), (2, 2));
        let stamps = table.column("TimeStamp").unwrap().f64().unwrap();
        assert_eq!(stamps.get(1), Some(1_000.0));
    }

    #[test]
    fn plan_longer_than_the_stream_is_rejected_unless_unverified() {
        let footer = FOOTER.replace(r#"count="2""#, r#"count="3""#);
        let bytes = hybrid_bytes(&footer);

        let file = HybridFile::from_bytes(bytes.clone()).unwrap();
        assert!(matches!(file.frames(), Err(SpeError::Format(_))));

        let lenient = DecodeOptions::builder().verify_frame_stream(false).build();
        let file = HybridFile::from_bytes_with(bytes, lenient).unwrap();
        let frames: Vec<_> = file.frames().unwrap().collect();
        assert_eq!(frames.len(), 3);
        assert!(frames[..2].iter().all(|f| f.is_ok()));
        // The third frame decodes from footer bytes; the 2x4 region still fits.
        assert!(frames[2].is_ok());
    }

    #[test]
    fn truncated_footer_is_a_format_error() {
        let mut bytes = hybrid_bytes(FOOTER);
        bytes.truncate(bytes.len() - 200);
        let file = HybridFile::from_bytes(bytes).unwrap();
        assert!(matches!(file.plan(), Err(SpeError::Format(_))));
        assert!(matches!(file.frames(), Err(SpeError::Format(_))));
    }

    #[test]
    fn footer_offset_past_the_end_is_truncated_data() {
        let mut bytes = hybrid_bytes(FOOTER);
        put(&mut bytes, XML_FOOTER_OFFSET_OFFSET, &1_000_000u64.to_le_bytes());
        let file = HybridFile::from_bytes(bytes).unwrap();
        assert!(matches!(
            file.footer_text(),
            Err(SpeError::TruncatedData { offset: 1_000_000, .. })
        ));
    }

    #[test]
    fn legacy_file_accessors() {
        let file = LegacyFile::from_bytes(legacy_bytes()).unwrap();
        assert_eq!(file.frame_width().unwrap(), 3);
        assert_eq!(file.frame_height().unwrap(), 1);
        assert_eq!(file.n_frames().unwrap(), 3);
        assert_eq!(file.pixel_type().unwrap(), PrimitiveTag::F32);
        assert_eq!(file.exposure_time().unwrap(), 0.5);
        assert_eq!(file.elapsed_times().unwrap(), vec![0.0, 0.5, 1.0]);
        assert_eq!(file.x_label().unwrap(), "Wavelength (nm)");
        assert_eq!(file.x_axis().unwrap(), &[500.0, 500.25, 500.5]);
        assert_eq!(file.y_axis().unwrap(), &[0.0]);
        assert!(file.header_json().unwrap().contains("\"xdim\": 3"));

        let frames: Vec<Frame> = file.frames().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2].regions[0].get(0, 2), Some(Number::Float(8.0)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_frames_match_sequential_frames() {
        let file = LegacyFile::from_bytes(legacy_bytes()).unwrap();
        let sequential: Vec<Frame> = file.frames().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(file.frames_parallel().unwrap(), sequential);
    }

    #[test]
    fn oversized_frame_count_is_a_format_error() {
        let footer = FOOTER.replace(r#"count="2""#, r#"count="18446744073709551615""#);
        let file = HybridFile::from_bytes(hybrid_bytes(&footer)).unwrap();
        assert_eq!(file.n_frames().unwrap(), u64::MAX);
        assert!(matches!(file.frames(), Err(SpeError::Format(_))));
    }

    #[test]
    fn oversized_region_is_a_format_error() {
        let footer = FOOTER.replace(
            r#"width="4" height="2" size="16""#,
            r#"width="4294967296" height="4294967296" size="0""#,
        );
        let lenient = DecodeOptions::builder().verify_frame_stream(false).build();
        let file = HybridFile::from_bytes_with(hybrid_bytes(&footer), lenient).unwrap();
        let mut frames = file.frames().unwrap();
        assert!(matches!(frames.next(), Some(Err(SpeError::Format(_)))));
        assert!(frames.next().is_none());
    }

    #[test]
    fn non_utf8_footer_is_a_format_error() {
        let mut bytes = hybrid_bytes(FOOTER);
        let footer_start = bytes.len() - FOOTER.len() - 4;
        bytes[footer_start + 60] = 0xff;
        let file = HybridFile::from_bytes(bytes).unwrap();
        assert!(matches!(file.footer_text(), Err(SpeError::Format(_))));
        assert!(matches!(file.plan(), Err(SpeError::Format(_))));
    }

    #[test]
    fn failed_initialisation_is_retried() {
        let cell: OnceCell<u32> = OnceCell::new();
        let failed = memoized(&cell, || Err(SpeError::Format("not yet".into())));
        assert!(matches!(failed, Err(SpeError::Format(_))));
        assert!(cell.get().is_none());

        assert_eq!(memoized(&cell, || Ok(7)).unwrap(), &7);
        assert_eq!(memoized(&cell, || Ok(8)).unwrap(), &7);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_frames_reject_an_oversized_stream() {
        let mut bytes = legacy_bytes();
        put(&mut bytes, XDIM_OFFSET, &u16::MAX.to_le_bytes());
        put(&mut bytes, YDIM_OFFSET, &u16::MAX.to_le_bytes());
        put(&mut bytes, NUM_FRAMES_OFFSET, &i32::MAX.to_le_bytes());
        let file = LegacyFile::from_bytes(bytes).unwrap();
        assert!(matches!(file.frames_parallel(), Err(SpeError::Format(_))));
    }

    #[test]
    fn detection_uses_the_header_version() {
        assert!(SpeFile::from_bytes(hybrid_bytes(FOOTER)).unwrap().is_hybrid());

        let lenient = DecodeOptions::builder().verify_frame_stream(false).build();
        let footer = FOOTER.replace(r#"count="2""#, r#"count="3""#);
        match SpeFile::from_bytes_with(hybrid_bytes(&footer), lenient).unwrap() {
            SpeFile::Hybrid(file) => assert_eq!(file.frames().unwrap().count(), 3),
            SpeFile::Legacy(_) => panic!("expected a hybrid file"),
        }

        let legacy = SpeFile::from_bytes(legacy_bytes()).unwrap();
        assert!(!legacy.is_hybrid());
        assert_eq!(legacy.frame_width().unwrap(), 3);
        assert_eq!(legacy.frames().unwrap().count(), 3);
    }
}
