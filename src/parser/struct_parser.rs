//! Schema-driven decoding of positional binary structures.

use tracing::trace;
use winnow::{Parser, combinator::repeat, error::ContextError};

use crate::error::{Result, SpeError};
use crate::parser::cursor::ByteCursor;
use crate::types::decoded::{DecodedStruct, DecodedValue};
use crate::types::primitive::{Number, PrimitiveTag};
use crate::types::schema::{Element, FieldSpec, StructureSchema};

/// Decodes one instance of `schema` from the cursor, field by field.
///
/// Nothing is skipped or defaulted: a short read anywhere aborts the whole
/// structure with [`SpeError::TruncatedData`].
pub fn decode_struct(schema: &StructureSchema, cursor: &mut ByteCursor<'_>) -> Result<DecodedStruct> {
    let mut decoded = DecodedStruct::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let value = decode_field(field, cursor)?;
        decoded.push(field.name, value);
    }
    Ok(decoded)
}

fn decode_field(field: &FieldSpec, cursor: &mut ByteCursor<'_>) -> Result<DecodedValue> {
    match field.element {
        Element::Primitive(tag) => decode_primitive(field.name, tag, field.count, cursor),
        Element::Nested(schema) => {
            trace!(
                field = field.name,
                schema = schema.name(),
                count = field.count,
                offset = cursor.position(),
                "decoding nested structure"
            );
            if field.count == 1 {
                decode_struct(schema, cursor).map(DecodedValue::Struct)
            } else {
                (0..field.count)
                    .map(|_| decode_struct(schema, cursor))
                    .collect::<Result<Vec<_>>>()
                    .map(DecodedValue::StructArray)
            }
        }
    }
}

fn decode_primitive(
    name: &str,
    tag: PrimitiveTag,
    count: usize,
    cursor: &mut ByteCursor<'_>,
) -> Result<DecodedValue> {
    let offset = cursor.position();
    let bytes = cursor.take(count * tag.width(), name)?;
    trace!(field = name, ?tag, count, offset, "decoding primitive field");

    if tag.is_text() {
        return Ok(DecodedValue::Text(strip_nul(bytes)));
    }

    let mut input = bytes;
    let values: Vec<Number> = repeat(count, |i: &mut &[u8]| tag.decode(i))
        .parse_next(&mut input)
        .map_err(|e: ContextError| {
            SpeError::Format(format!("cannot decode `{name}` at offset {offset}: {e:?}"))
        })?;

    match values.as_slice() {
        [single] if count == 1 => Ok(DecodedValue::Scalar(*single)),
        _ => Ok(DecodedValue::Sequence(values)),
    }
}

/// Text of a character block, without leading or trailing NUL bytes.
pub(crate) fn strip_nul(bytes: &[u8]) -> String {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| b != 0).map_or(start, |i| i + 1);
    String::from_utf8_lossy(&bytes[start..end]).into_owned()
}
