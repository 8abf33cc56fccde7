//! Types for representing decoded frames and their pixel data

use ndarray::Array2;
use serde::Serialize;
use winnow::{
    Parser,
    binary::{le_f32, le_f64, le_i8, le_i16, le_i32, le_i64, le_u8, le_u16, le_u32, le_u64},
    combinator::repeat,
    error::ContextError,
};

use crate::error::{Result, SpeError};
use crate::types::primitive::{Number, PrimitiveTag};

/// A row-major `height × width` pixel buffer of one primitive type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pixels {
    I8(Array2<i8>),
    U8(Array2<u8>),
    I16(Array2<i16>),
    U16(Array2<u16>),
    I32(Array2<i32>),
    U32(Array2<u32>),
    I64(Array2<i64>),
    U64(Array2<u64>),
    F32(Array2<f32>),
    F64(Array2<f64>),
}

macro_rules! for_each_pixels {
    ($pixels:expr, $array:ident => $body:expr) => {
        match $pixels {
            Pixels::I8($array) => $body,
            Pixels::U8($array) => $body,
            Pixels::I16($array) => $body,
            Pixels::U16($array) => $body,
            Pixels::I32($array) => $body,
            Pixels::U32($array) => $body,
            Pixels::I64($array) => $body,
            Pixels::U64($array) => $body,
            Pixels::F32($array) => $body,
            Pixels::F64($array) => $body,
        }
    };
}

fn shaped<'a, T>(
    mut input: &'a [u8],
    (rows, cols): (usize, usize),
    element: impl Parser<&'a [u8], T, ContextError>,
) -> Result<Array2<T>> {
    let count = rows.checked_mul(cols).ok_or_else(|| oversized(rows, cols))?;
    let values: Vec<T> = repeat(count, element)
        .parse_next(&mut input)
        .map_err(|e| SpeError::Format(format!("cannot decode pixel block: {e:?}")))?;
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| SpeError::Format(format!("pixel block does not fit {rows}x{cols}: {e}")))
}

fn oversized(rows: usize, cols: usize) -> SpeError {
    SpeError::Format(format!("region of {rows}x{cols} pixels overflows the address space"))
}

impl Pixels {
    /// Reinterprets `bytes` as `rows × cols` little-endian elements of `tag`.
    ///
    /// The byte count must be exactly `rows * cols * tag.width()`.
    pub fn decode(tag: PrimitiveTag, bytes: &[u8], shape: (usize, usize)) -> Result<Self> {
        let (rows, cols) = shape;
        let expected = rows
            .checked_mul(cols)
            .and_then(|count| count.checked_mul(tag.width()))
            .ok_or_else(|| oversized(rows, cols))?;
        if bytes.len() != expected {
            return Err(SpeError::Format(format!(
                "region of {rows}x{cols} {tag:?} pixels needs {expected} bytes, block holds {}",
                bytes.len()
            )));
        }

        Ok(match tag {
            PrimitiveTag::I8 => Pixels::I8(shaped(bytes, shape, le_i8)?),
            PrimitiveTag::U8 => Pixels::U8(shaped(bytes, shape, le_u8)?),
            PrimitiveTag::I16 => Pixels::I16(shaped(bytes, shape, le_i16)?),
            PrimitiveTag::U16 => Pixels::U16(shaped(bytes, shape, le_u16)?),
            PrimitiveTag::I32 => Pixels::I32(shaped(bytes, shape, le_i32)?),
            PrimitiveTag::U32 => Pixels::U32(shaped(bytes, shape, le_u32)?),
            PrimitiveTag::I64 => Pixels::I64(shaped(bytes, shape, le_i64)?),
            PrimitiveTag::U64 => Pixels::U64(shaped(bytes, shape, le_u64)?),
            PrimitiveTag::F32 => Pixels::F32(shaped(bytes, shape, le_f32)?),
            PrimitiveTag::F64 => Pixels::F64(shaped(bytes, shape, le_f64)?),
            PrimitiveTag::Char => {
                return Err(SpeError::UnknownType("char is not a pixel type".into()));
            }
        })
    }

    pub fn pixel_type(&self) -> PrimitiveTag {
        match self {
            Pixels::I8(_) => PrimitiveTag::I8,
            Pixels::U8(_) => PrimitiveTag::U8,
            Pixels::I16(_) => PrimitiveTag::I16,
            Pixels::U16(_) => PrimitiveTag::U16,
            Pixels::I32(_) => PrimitiveTag::I32,
            Pixels::U32(_) => PrimitiveTag::U32,
            Pixels::I64(_) => PrimitiveTag::I64,
            Pixels::U64(_) => PrimitiveTag::U64,
            Pixels::F32(_) => PrimitiveTag::F32,
            Pixels::F64(_) => PrimitiveTag::F64,
        }
    }

    /// `(rows, cols)`, i.e. `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        for_each_pixels!(self, array => array.dim())
    }
}

/// One region of a frame: an immutable pixel block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionData {
    pub width: usize,
    pub height: usize,
    pixels: Pixels,
}

impl RegionData {
    pub fn new(pixels: Pixels) -> Self {
        let (height, width) = pixels.shape();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    pub fn into_pixels(self) -> Pixels {
        self.pixels
    }

    pub fn pixel_type(&self) -> PrimitiveTag {
        self.pixels.pixel_type()
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Number> {
        match &self.pixels {
            Pixels::I8(a) => a.get((row, col)).map(|&v| Number::Int(v.into())),
            Pixels::U8(a) => a.get((row, col)).map(|&v| Number::UInt(v.into())),
            Pixels::I16(a) => a.get((row, col)).map(|&v| Number::Int(v.into())),
            Pixels::U16(a) => a.get((row, col)).map(|&v| Number::UInt(v.into())),
            Pixels::I32(a) => a.get((row, col)).map(|&v| Number::Int(v.into())),
            Pixels::U32(a) => a.get((row, col)).map(|&v| Number::UInt(v.into())),
            Pixels::I64(a) => a.get((row, col)).map(|&v| Number::Int(v)),
            Pixels::U64(a) => a.get((row, col)).map(|&v| Number::UInt(v)),
            Pixels::F32(a) => a.get((row, col)).map(|&v| Number::Float(v.into())),
            Pixels::F64(a) => a.get((row, col)).map(|&v| Number::Float(v)),
        }
    }

    /// The pixels widened to `f64`.
    pub fn to_f64(&self) -> Array2<f64> {
        for_each_pixels!(&self.pixels, array => array.mapv(|v| v as f64))
    }
}

/// One exposure: its regions in decode order plus per-frame metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub regions: Vec<RegionData>,
    pub metadata: Vec<Number>,
}
