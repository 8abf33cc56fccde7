//! The compiled layout of a LightField frame stream.

use serde::Serialize;

use crate::error::{Result, SpeError};
use crate::types::descriptor::{FrameDescriptor, MetadataFieldDescriptor, RegionDescriptor};

/// One frame block with the regions and metadata fields it decodes into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub frame: FrameDescriptor,
    pub regions: Vec<RegionDescriptor>,
    pub metadata: Vec<MetadataFieldDescriptor>,
}

impl PlanEntry {
    /// Bytes one frame of this entry occupies: every region, then every
    /// metadata value.
    pub fn frame_len(&self) -> Result<u64> {
        let pixels = self
            .regions
            .iter()
            .try_fold(0u64, |total, region| total.checked_add(region.byte_size))
            .ok_or_else(overflow)?;
        self.metadata.iter().try_fold(pixels, |total, field| {
            total
                .checked_add(field.primitive()?.width() as u64)
                .ok_or_else(overflow)
        })
    }
}

/// Plan entries in document order, which is also on-disk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameDecodePlan {
    entries: Vec<PlanEntry>,
}

impl FrameDecodePlan {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total frames the plan yields across all entries.
    pub fn frame_count(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |total, entry| total.saturating_add(entry.frame.count))
    }

    /// Exact number of frame-stream bytes the plan consumes.
    pub fn stream_len(&self) -> Result<u64> {
        self.entries.iter().try_fold(0u64, |total, entry| {
            entry
                .frame_len()?
                .checked_mul(entry.frame.count)
                .and_then(|len| total.checked_add(len))
                .ok_or_else(overflow)
        })
    }
}

fn overflow() -> SpeError {
    SpeError::Format("frame decode plan size overflows".into())
}
