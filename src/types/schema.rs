//! Declarative layouts for positional binary structures.

use crate::types::primitive::PrimitiveTag;

/// What a field repeats: a primitive or a nested structure.
#[derive(Debug, Clone, Copy)]
pub enum Element {
    Primitive(PrimitiveTag),
    Nested(&'static StructureSchema),
}

/// One named field of a [`StructureSchema`].
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub count: usize,
    pub element: Element,
}

impl FieldSpec {
    pub const fn primitive(name: &'static str, count: usize, tag: PrimitiveTag) -> Self {
        assert!(count > 0, "field count must be positive");
        Self {
            name,
            count,
            element: Element::Primitive(tag),
        }
    }

    pub const fn nested(name: &'static str, count: usize, schema: &'static StructureSchema) -> Self {
        assert!(count > 0, "field count must be positive");
        Self {
            name,
            count,
            element: Element::Nested(schema),
        }
    }

    /// Bytes this field occupies in the stream.
    pub const fn byte_size(&self) -> usize {
        let element = match self.element {
            Element::Primitive(tag) => tag.width(),
            Element::Nested(schema) => schema.byte_size(),
        };
        element * self.count
    }
}

/// An ordered field list. Field order is byte order.
#[derive(Debug)]
pub struct StructureSchema {
    name: &'static str,
    fields: &'static [FieldSpec],
}

impl StructureSchema {
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { name, fields }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Total bytes consumed when decoding one instance.
    pub const fn byte_size(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].byte_size();
            i += 1;
        }
        total
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}
