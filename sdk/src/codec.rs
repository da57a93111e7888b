//! Reference enumeration driver.
//!
//! The codec walks a struct descriptor and pulls fields out of a [`Wire`]
//! implementation one at a time, or pushes wire data back in through it.
//! Wire layout per struct: `varuint field_count`, then per field in
//! declaration order `varuint tag` followed by the payload — a bare value for
//! scalars, `varuint count` plus elements for repeated and map fields.
//! Nested structs recurse with the same layout.

use pullwire_schema::{Cardinality, FieldKind, FieldNode, StructNode};

use crate::args::{FieldArgs, Wire};
use crate::bb::{ByteBuffer, WriteBuffer};
use crate::cursor::MapCursor;
use crate::error::WireError;
use crate::registry::Registry;

impl Registry {
    /// Encode a full message through its generated dispatcher. `name` is the
    /// dotted qualified struct name.
    pub fn encode(&self, name: &str, msg: &dyn Wire) -> Result<Vec<u8>, WireError> {
        let st = self
            .lookup(name)
            .ok_or_else(|| WireError::UnknownStruct(name.to_string()))?;
        let mut out = WriteBuffer::new();
        self.encode_struct_into(st, msg, &mut out)?;
        Ok(out.into_vec())
    }

    /// Decode a full message in place. Returns the bytes consumed.
    pub fn decode(&self, name: &str, msg: &mut dyn Wire, data: &[u8]) -> Result<usize, WireError> {
        let st = self
            .lookup(name)
            .ok_or_else(|| WireError::UnknownStruct(name.to_string()))?;
        let mut input = ByteBuffer::new(data);
        self.decode_struct_from(st, msg, &mut input)
    }

    pub fn encode_struct_into(
        &self,
        st: &StructNode,
        msg: &dyn Wire,
        out: &mut WriteBuffer,
    ) -> Result<usize, WireError> {
        let start = out.len();
        out.write_var_uint(st.fields.len() as u32);
        st.for_each_field(|field| {
            out.write_var_uint(field.tag);
            match field.card {
                Cardinality::Scalar => {
                    let nested = self.field_struct(field)?;
                    let mut args = FieldArgs::write(self, field.tag, out);
                    if let Some(st) = nested {
                        args = args.with_descriptor(st);
                    }
                    msg.encode_field(&mut args)?;
                    Ok(())
                }
                Cardinality::Indexed => self.encode_elements(field, msg, out, false),
                Cardinality::Map { .. } => self.encode_elements(field, msg, out, true),
            }
        })?;
        Ok(out.len() - start)
    }

    /// Pull elements with idx = 0, 1, 2, … until the dispatcher reports
    /// `NoField`; the watermark becomes the element count on the wire.
    fn encode_elements(
        &self,
        field: &FieldNode,
        msg: &dyn Wire,
        out: &mut WriteBuffer,
        with_cursor: bool,
    ) -> Result<(), WireError> {
        let nested = self.field_struct(field)?;
        let mut elements = WriteBuffer::new();
        let mut cursor = MapCursor::new();
        let mut idx: u32 = 0;
        let count = loop {
            let mut args = FieldArgs::write(self, field.tag, &mut elements).with_idx(idx);
            if let Some(st) = nested {
                args = args.with_descriptor(st);
            }
            if with_cursor {
                args = args.with_cursor(&mut cursor);
            }
            match msg.encode_field(&mut args) {
                Ok(_) => idx += 1,
                Err(WireError::NoField { watermark }) => break watermark,
                Err(err) => return Err(err),
            }
        };
        out.write_var_uint(count);
        out.extend_from(&elements);
        Ok(())
    }

    pub fn decode_struct_from(
        &self,
        st: &StructNode,
        msg: &mut dyn Wire,
        input: &mut ByteBuffer<'_>,
    ) -> Result<usize, WireError> {
        let start = input.index();
        let field_count = input.read_var_uint()?;
        for _ in 0..field_count {
            let tag = input.read_var_uint()?;
            let field = st.field_by_tag(tag).ok_or(WireError::UnknownTag(tag))?;
            let nested = self.field_struct(field)?;
            match field.card {
                Cardinality::Scalar => {
                    let mut args = FieldArgs::read(self, tag, input);
                    if let Some(st) = nested {
                        args = args.with_descriptor(st);
                    }
                    msg.decode_field(&mut args)?;
                }
                Cardinality::Indexed | Cardinality::Map { .. } => {
                    let count = input.read_var_uint()?;
                    if count == 0 {
                        // Absent: dispatch once so the field observes len 0.
                        let mut args = FieldArgs::read(self, tag, input).with_idx(0).with_len(0);
                        if let Some(st) = nested {
                            args = args.with_descriptor(st);
                        }
                        msg.decode_field(&mut args)?;
                    } else {
                        for idx in 0..count {
                            let mut args =
                                FieldArgs::read(self, tag, input).with_idx(idx).with_len(count);
                            if let Some(st) = nested {
                                args = args.with_descriptor(st);
                            }
                            msg.decode_field(&mut args)?;
                        }
                    }
                }
            }
        }
        Ok(input.index() - start)
    }

    fn field_struct(&self, field: &FieldNode) -> Result<Option<&StructNode>, WireError> {
        match &field.kind {
            FieldKind::Struct(path) => {
                let st = self
                    .lookup(path)
                    .ok_or_else(|| WireError::UnknownStruct(path.clone()))?;
                Ok(Some(st))
            }
            _ => Ok(None),
        }
    }
}
