use tracing::{debug, warn};
use winnow::{
    Parser,
    binary::{le_f32, le_i16, le_i32, le_u16, le_u64},
    error::ContextError,
};

use crate::config::DecodeOptions;
use crate::error::{Result, SpeError};
use crate::parser::cursor::ByteCursor;
use crate::parser::struct_parser::decode_struct;
use crate::types::decoded::DecodedStruct;
use crate::types::header::{FrameGeometry, LEGACY_HEADER_SCHEMA, SparseHeader};
use crate::types::primitive::PrimitiveTag;
use crate::types::schema::StructureSchema;
use crate::utils::misc::*;

/// Decodes the fixed WinSpec header from the start of the file.
pub fn parse_legacy_header(data: &[u8], options: &DecodeOptions) -> Result<DecodedStruct> {
    parse_header_with(data, &LEGACY_HEADER_SCHEMA, options)
}

/// Decodes `schema` from the start of `data` and checks that it ends where
/// the frame stream begins.
///
/// Vendor sub-versions are known to drift slightly, so a mismatch is only
/// logged unless `options.strict_header` is set.
pub fn parse_header_with(
    data: &[u8],
    schema: &StructureSchema,
    options: &DecodeOptions,
) -> Result<DecodedStruct> {
    let mut cursor = ByteCursor::new(data);
    let header = decode_struct(schema, &mut cursor)?;

    let consumed = cursor.position();
    if consumed != LEGACY_HEADER_SIZE {
        if options.strict_header {
            return Err(SpeError::Format(format!(
                "header `{}` ended at byte {consumed}, expected {LEGACY_HEADER_SIZE}",
                schema.name()
            )));
        }
        warn!(
            schema = schema.name(),
            consumed,
            expected = LEGACY_HEADER_SIZE,
            "header did not end at the frame stream offset"
        );
    }
    Ok(header)
}

/// Pulls frame dimensions and pixel type out of a decoded legacy header.
pub fn legacy_geometry(header: &DecodedStruct) -> Result<FrameGeometry> {
    let code = header
        .scalar("datatype")?
        .as_i64()
        .ok_or_else(|| SpeError::Format("`datatype` is not an integer".into()))?;

    let geometry = FrameGeometry::builder()
        .width(header.unsigned("xdim")? as usize)
        .height(header.unsigned("ydim")? as usize)
        .frame_count(header.unsigned("NumFrames")? as usize)
        .pixel_type(PrimitiveTag::from_legacy_code(code)?)
        .build();
    debug!(?geometry, "legacy frame geometry");
    Ok(geometry)
}

fn read_at<'a, T>(
    data: &'a [u8],
    offset: usize,
    field: &str,
    mut parser: impl Parser<&'a [u8], T, ContextError>,
) -> Result<T> {
    let mut input = ByteCursor::at(data, offset).take(std::mem::size_of::<T>(), field)?;
    parser
        .parse_next(&mut input)
        .map_err(|e| SpeError::Format(format!("cannot decode `{field}` at offset {offset}: {e:?}")))
}

/// Reads the individually addressed fields of a LightField header.
///
/// Each field is read from its own absolute offset; nothing assumes the
/// fields are contiguous.
pub fn parse_sparse_header(data: &[u8]) -> Result<SparseHeader> {
    let header = SparseHeader::builder()
        .file_header_ver(read_at(data, FILE_HEADER_VER_OFFSET, "file_header_ver", le_f32)?)
        .xml_footer_offset(read_at(data, XML_FOOTER_OFFSET_OFFSET, "xml_footer_offset", le_u64)?)
        .datatype(read_at(data, DATATYPE_OFFSET, "datatype", le_i16)?)
        .xdim(read_at(data, XDIM_OFFSET, "xdim", le_u16)?)
        .ydim(read_at(data, YDIM_OFFSET, "ydim", le_u16)?)
        .num_frames(read_at(data, NUM_FRAMES_OFFSET, "NumFrames", le_i32)?)
        .x_dim_det(read_at(data, X_DIM_DET_OFFSET, "xDimDet", le_u16)?)
        .y_dim_det(read_at(data, Y_DIM_DET_OFFSET, "yDimDet", le_u16)?)
        .noscan(read_at(data, NOSCAN_OFFSET, "noscan", le_i16)?)
        .lnoscan(read_at(data, LNOSCAN_OFFSET, "lnoscan", le_i32)?)
        .scramble(read_at(data, SCRAMBLE_OFFSET, "scramble", le_i16)?)
        .winview_id(read_at(data, WINVIEW_ID_OFFSET, "WinView_id", le_i32)?)
        .lastvalue(read_at(data, LAST_VALUE_OFFSET, "lastvalue", le_i16)?)
        .build();
    debug!(?header, "sparse header");
    Ok(header)
}

/// The header version stored at byte 1992, used to tell the variants apart.
pub fn parse_header_version(data: &[u8]) -> Result<f32> {
    read_at(data, FILE_HEADER_VER_OFFSET, "file_header_ver", le_f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::primitive::{Number, PrimitiveTag::*};
    use crate::types::schema::FieldSpec;

    fn put(bytes: &mut [u8], offset: usize, value: &[u8]) {
        bytes[offset..offset + value.len()].copy_from_slice(value);
    }

    fn legacy_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; LEGACY_HEADER_SIZE];
        put(&mut bytes, 10, &0.25f32.to_le_bytes());
        put(&mut bytes, 20, b"01Jan2014\0");
        put(&mut bytes, XDIM_OFFSET, &640u16.to_le_bytes());
        put(&mut bytes, DATATYPE_OFFSET, &3i16.to_le_bytes());
        put(&mut bytes, YDIM_OFFSET, &480u16.to_le_bytes());
        put(&mut bytes, NUM_FRAMES_OFFSET, &5i32.to_le_bytes());
        bytes
    }

    #[test]
    fn legacy_header_decodes_named_fields() {
        let header = parse_legacy_header(&legacy_bytes(), &DecodeOptions::default()).unwrap();
        assert_eq!(header.scalar("exp_sec").unwrap(), Number::Float(0.25));
        assert_eq!(header.text("date").unwrap(), "01Jan2014");
        assert_eq!(header.structures("ROI").unwrap().len(), 10);
        assert_eq!(header.structures("Comments").unwrap().len(), 5);

        let geometry = legacy_geometry(&header).unwrap();
        assert_eq!(geometry.width, 640);
        assert_eq!(geometry.height, 480);
        assert_eq!(geometry.frame_count, 5);
        assert_eq!(geometry.pixel_type, U16);
    }

    #[test]
    fn short_legacy_header_is_truncated() {
        let bytes = &legacy_bytes()[..LEGACY_HEADER_SIZE - 1];
        let err = parse_legacy_header(bytes, &DecodeOptions::default()).unwrap_err();
        assert!(matches!(err, SpeError::TruncatedData { ref field, .. } if field == "lastvalue"));
    }

    #[test]
    fn unsupported_legacy_datatype_is_unknown_type() {
        let mut bytes = legacy_bytes();
        put(&mut bytes, DATATYPE_OFFSET, &5i16.to_le_bytes());
        let header = parse_legacy_header(&bytes, &DecodeOptions::default()).unwrap();
        assert!(matches!(legacy_geometry(&header), Err(SpeError::UnknownType(_))));
    }

    static SHORT_HEADER: StructureSchema = StructureSchema::new(
        "short_header",
        &[FieldSpec::primitive("xdim", 1, U16), FieldSpec::primitive("rest", 4000, U8)],
    );

    #[test]
    fn header_extent_mismatch_warns_unless_strict() {
        crate::logger::try_init();
        let bytes = legacy_bytes();

        let tolerant = parse_header_with(&bytes, &SHORT_HEADER, &DecodeOptions::default());
        assert!(tolerant.is_ok());

        let strict = DecodeOptions::builder().strict_header(true).build();
        let err = parse_header_with(&bytes, &SHORT_HEADER, &strict).unwrap_err();
        assert!(matches!(err, SpeError::Format(_)));
    }

    #[test]
    fn sparse_header_reads_each_field_at_its_offset() {
        let mut bytes = vec![0u8; LEGACY_HEADER_SIZE];
        put(&mut bytes, FILE_HEADER_VER_OFFSET, &3.0f32.to_le_bytes());
        put(&mut bytes, XML_FOOTER_OFFSET_OFFSET, &123_456u64.to_le_bytes());
        put(&mut bytes, DATATYPE_OFFSET, &3i16.to_le_bytes());
        put(&mut bytes, XDIM_OFFSET, &1024u16.to_le_bytes());
        put(&mut bytes, YDIM_OFFSET, &256u16.to_le_bytes());
        put(&mut bytes, NUM_FRAMES_OFFSET, &10i32.to_le_bytes());
        put(&mut bytes, LAST_VALUE_OFFSET, &0x5555i16.to_le_bytes());

        let header = parse_sparse_header(&bytes).unwrap();
        assert_eq!(header.file_header_ver, 3.0);
        assert_eq!(header.xml_footer_offset, 123_456);
        assert_eq!(header.datatype, 3);
        assert_eq!(header.xdim, 1024);
        assert_eq!(header.ydim, 256);
        assert_eq!(header.num_frames, 10);
        assert_eq!(header.lastvalue, 0x5555);
        assert_eq!(parse_header_version(&bytes).unwrap(), 3.0);
    }

    #[test]
    fn sparse_header_needs_the_last_field() {
        let bytes = vec![0u8; LAST_VALUE_OFFSET + 1];
        let err = parse_sparse_header(&bytes).unwrap_err();
        assert!(matches!(
            err,
            SpeError::TruncatedData { offset: LAST_VALUE_OFFSET, expected: 2, available: 1, .. }
        ));
    }
}
