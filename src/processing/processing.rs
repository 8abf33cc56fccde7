use std::collections::HashMap;

use itertools::Itertools;
use polars::prelude::*;

use crate::error::{Result, SpeError};
use crate::types::decoded::DecodedStruct;
use crate::types::descriptor::MetadataFieldDescriptor;
use crate::types::pixel_data::Frame;

/// Evaluates a header calibration polynomial over pixel indices `[0, len)`.
///
/// Coefficient `k` contributes `coeff[k] * p^k` while `k <= polynom_order`.
/// A negative order yields an all-zero axis.
pub fn polynomial_axis(calibration: &DecodedStruct, len: usize) -> Result<Vec<f64>> {
    let order = calibration
        .scalar("polynom_order")?
        .as_i64()
        .ok_or_else(|| SpeError::Format("`polynom_order` is not an integer".into()))?;
    let coefficients = calibration
        .sequence("polynom_coeff")?
        .iter()
        .map(|c| c.as_f64())
        .collect_vec();

    let terms = usize::try_from(order.saturating_add(1))
        .unwrap_or(0)
        .min(coefficients.len());
    let coefficients = &coefficients[..terms];

    Ok((0..len)
        .map(|pixel| {
            let p = pixel as f64;
            coefficients
                .iter()
                .enumerate()
                .map(|(power, c)| c * p.powi(power as i32))
                .sum::<f64>()
        })
        .collect())
}

/// Start time of each frame relative to the first: `index * exposure`.
pub fn elapsed_times(n_frames: usize, exposure: f64) -> Vec<f64> {
    (0..n_frames).map(|i| i as f64 * exposure).collect()
}

/// Column names for a list of metadata fields: the element name, with
/// `_1`, `_2`, ... appended to repeats.
pub fn metadata_column_names(fields: &[MetadataFieldDescriptor]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    fields
        .iter()
        .map(|field| {
            let count = seen.entry(field.tag_name.as_str()).or_insert(0);
            let name = match *count {
                0 => field.tag_name.clone(),
                n => format!("{}_{n}", field.tag_name),
            };
            *count += 1;
            name
        })
        .collect()
}

/// Tabulates per-frame metadata: a `frame` index column followed by one
/// `f64` column per entry of `columns`.
///
/// Every frame must carry exactly `columns.len()` metadata values. The
/// first decode error aborts the table.
pub fn metadata_table<I>(columns: &[String], frames: I) -> Result<DataFrame>
where
    I: IntoIterator<Item = Result<Frame>>,
{
    let mut indices: Vec<u64> = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); columns.len()];

    for (index, frame) in frames.into_iter().enumerate() {
        let frame = frame?;
        if frame.metadata.len() != columns.len() {
            return Err(SpeError::Format(format!(
                "frame {index} carries {} metadata values, expected {} ({})",
                frame.metadata.len(),
                columns.len(),
                columns.iter().join(", ")
            )));
        }
        indices.push(index as u64);
        for (column, value) in values.iter_mut().zip(&frame.metadata) {
            column.push(value.as_f64());
        }
    }

    let mut series: Vec<Column> = Vec::with_capacity(columns.len() + 1);
    series.push(Series::new("frame".into(), &indices).into());
    for (name, column) in columns.iter().zip(&values) {
        series.push(Series::new(name.as_str().into(), column).into());
    }
    Ok(DataFrame::new(series)?)
}
