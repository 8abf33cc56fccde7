use tracing::trace;

use crate::error::{Result, SpeError};
use crate::parser::cursor::ByteCursor;
use crate::types::header::FrameGeometry;
use crate::types::pixel_data::{Frame, Pixels, RegionData};
use crate::types::plan::{FrameDecodePlan, PlanEntry};
use crate::types::primitive::{Number, PrimitiveTag};
use crate::utils::misc::FRAME_STREAM_OFFSET;

/// Decodes one frame of `entry`: every region, then every metadata value.
///
/// On error the cursor may have advanced partway into the frame; no
/// partial frame is returned.
pub fn decode_frame(entry: &PlanEntry, cursor: &mut ByteCursor) -> Result<Frame> {
    let pixel_type = entry.frame.pixel_type()?;

    let regions = entry
        .regions
        .iter()
        .map(|region| {
            let bytes = cursor.take(region.byte_size as usize, "region")?;
            Pixels::decode(pixel_type, bytes, (region.height, region.width)).map(RegionData::new)
        })
        .collect::<Result<Vec<_>>>()?;

    let metadata = entry
        .metadata
        .iter()
        .map(|field| decode_metadata_value(field.primitive()?, &field.tag_name, cursor))
        .collect::<Result<Vec<_>>>()?;

    Ok(Frame { regions, metadata })
}

fn decode_metadata_value(
    tag: PrimitiveTag,
    name: &str,
    cursor: &mut ByteCursor,
) -> Result<Number> {
    let offset = cursor.position();
    let mut bytes = cursor.take(tag.width(), name)?;
    tag.decode(&mut bytes)
        .map_err(|e| SpeError::Format(format!("cannot decode `{name}` at offset {offset}: {e:?}")))
}

/// Decodes one legacy frame: a single full-sensor region, no metadata.
pub fn decode_legacy_frame(geometry: &FrameGeometry, cursor: &mut ByteCursor) -> Result<Frame> {
    let bytes = cursor.take(geometry.frame_bytes(), "frame")?;
    let pixels = Pixels::decode(geometry.pixel_type, bytes, (geometry.height, geometry.width))?;
    Ok(Frame {
        regions: vec![RegionData::new(pixels)],
        metadata: Vec::new(),
    })
}

/// Lazy, forward-only sequence of frames following a decode plan.
///
/// Frames are decoded on demand from the frame-stream start offset in plan
/// order. The sequence ends after the plan's total frame count, or right
/// after the first error.
#[derive(Debug)]
pub struct Frames<'a> {
    cursor: ByteCursor<'a>,
    plan: &'a FrameDecodePlan,
    entry: usize,
    decoded_in_entry: u64,
    failed: bool,
}

impl<'a> Frames<'a> {
    pub fn new(data: &'a [u8], plan: &'a FrameDecodePlan) -> Self {
        Self {
            cursor: ByteCursor::at(data, FRAME_STREAM_OFFSET),
            plan,
            entry: 0,
            decoded_in_entry: 0,
            failed: false,
        }
    }

    /// Absolute offset of the next frame.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn remaining(&self) -> u64 {
        if self.failed {
            return 0;
        }
        let rest = self
            .plan
            .entries()
            .iter()
            .skip(self.entry)
            .fold(0u64, |total, entry| total.saturating_add(entry.frame.count));
        rest.saturating_sub(self.decoded_in_entry)
    }
}

impl Iterator for Frames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let plan = self.plan;
        let entry = loop {
            let entry = plan.entries().get(self.entry)?;
            if self.decoded_in_entry < entry.frame.count {
                break entry;
            }
            self.entry += 1;
            self.decoded_in_entry = 0;
        };

        trace!(
            entry = self.entry,
            frame = self.decoded_in_entry,
            offset = self.cursor.position(),
            "decoding frame"
        );
        let frame = decode_frame(entry, &mut self.cursor);
        self.decoded_in_entry += 1;
        self.failed = frame.is_err();
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (0, Some(remaining))
    }
}

/// Lazy sequence of fixed-size legacy frames.
#[derive(Debug)]
pub struct LegacyFrames<'a> {
    cursor: ByteCursor<'a>,
    geometry: FrameGeometry,
    remaining: usize,
}

impl<'a> LegacyFrames<'a> {
    pub fn new(data: &'a [u8], geometry: FrameGeometry) -> Self {
        Self {
            cursor: ByteCursor::at(data, FRAME_STREAM_OFFSET),
            remaining: geometry.frame_count,
            geometry,
        }
    }
}

impl Iterator for LegacyFrames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let frame = decode_legacy_frame(&self.geometry, &mut self.cursor);
        self.remaining = if frame.is_ok() { self.remaining - 1 } else { 0 };
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
