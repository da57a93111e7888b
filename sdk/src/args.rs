use pullwire_schema::StructNode;

use crate::bb::{ByteBuffer, WriteBuffer};
use crate::cursor::MapCursor;
use crate::error::WireError;
use crate::registry::Registry;

/// Pull-based field enumeration protocol implemented by every generated
/// message type.
///
/// - `encode_field` writes the value selected by `args.tag` (and `args.idx`
///   for repeated/map fields) and returns the bytes written, or
///   `Err(NoField)` when the enumeration of that field is exhausted.
/// - `decode_field` reads into the selected value and returns the bytes
///   consumed, or `Ok(0)` when the field is absent (`args.len == 0`), in
///   which case nothing is mutated.
/// - `reset` returns every field to its zero state, in declaration order.
pub trait Wire {
    fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError>;
    fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError>;
    fn reset(&mut self);
}

enum Io<'a, 'b> {
    Write(&'a mut WriteBuffer),
    Read(&'a mut ByteBuffer<'b>),
}

/// Per-call context handed to a generated dispatcher: the field tag, the
/// element index for repeated/map fields, the wire I/O, and — when the field
/// references a nested struct — its resolved descriptor.
pub struct FieldArgs<'a, 'b> {
    /// Dispatch key of the field being enumerated.
    pub tag: u32,
    /// Element index for repeated and map fields.
    pub idx: Option<u32>,
    /// Decode side: elements present on the wire for this field. 0 means
    /// absent.
    pub len: u32,
    registry: &'a Registry,
    st:       Option<&'a StructNode>,
    cursor:   Option<&'a mut MapCursor>,
    io:       Io<'a, 'b>,
}

impl<'a, 'b> FieldArgs<'a, 'b> {
    /// Args for one encode call.
    pub fn write(registry: &'a Registry, tag: u32, out: &'a mut WriteBuffer) -> Self {
        FieldArgs {
            tag,
            idx: None,
            len: 0,
            registry,
            st: None,
            cursor: None,
            io: Io::Write(out),
        }
    }

    /// Args for one decode call. `len` defaults to 1 (value present).
    pub fn read(registry: &'a Registry, tag: u32, input: &'a mut ByteBuffer<'b>) -> Self {
        FieldArgs {
            tag,
            idx: None,
            len: 1,
            registry,
            st: None,
            cursor: None,
            io: Io::Read(input),
        }
    }

    pub fn with_idx(mut self, idx: u32) -> Self {
        self.idx = Some(idx);
        self
    }

    pub fn with_len(mut self, len: u32) -> Self {
        self.len = len;
        self
    }

    pub fn with_descriptor(mut self, st: &'a StructNode) -> Self {
        self.st = Some(st);
        self
    }

    pub fn with_cursor(mut self, cursor: &'a mut MapCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn require_idx(&self) -> Result<u32, WireError> {
        self.idx.ok_or(WireError::MissingIndex(self.tag))
    }

    pub fn cursor(&mut self) -> Result<&mut MapCursor, WireError> {
        let tag = self.tag;
        self.cursor
            .as_deref_mut()
            .ok_or(WireError::MissingCursor(tag))
    }

    fn writer(&mut self) -> Result<&mut WriteBuffer, WireError> {
        match &mut self.io {
            Io::Write(out) => Ok(out),
            Io::Read(_) => Err(WireError::Direction {
                built: "read",
                used:  "write",
            }),
        }
    }

    fn reader(&mut self) -> Result<&mut ByteBuffer<'b>, WireError> {
        match &mut self.io {
            Io::Read(input) => Ok(input),
            Io::Write(_) => Err(WireError::Direction {
                built: "write",
                used:  "read",
            }),
        }
    }

    pub fn write_bool(&mut self, value: bool) -> Result<usize, WireError> {
        Ok(self.writer()?.write_bool(value))
    }

    pub fn write_int32(&mut self, value: i32) -> Result<usize, WireError> {
        Ok(self.writer()?.write_var_int(value))
    }

    pub fn write_int64(&mut self, value: i64) -> Result<usize, WireError> {
        Ok(self.writer()?.write_var_int64(value))
    }

    pub fn write_float(&mut self, value: f32) -> Result<usize, WireError> {
        Ok(self.writer()?.write_float(value))
    }

    pub fn write_string(&mut self, value: &str) -> Result<usize, WireError> {
        Ok(self.writer()?.write_string(value))
    }

    pub fn read_bool(&mut self, slot: &mut bool) -> Result<usize, WireError> {
        if self.len == 0 {
            return Ok(0);
        }
        let input = self.reader()?;
        let start = input.index();
        *slot = input.read_bool()?;
        Ok(input.index() - start)
    }

    pub fn read_int32(&mut self, slot: &mut i32) -> Result<usize, WireError> {
        if self.len == 0 {
            return Ok(0);
        }
        let input = self.reader()?;
        let start = input.index();
        *slot = input.read_var_int()?;
        Ok(input.index() - start)
    }

    pub fn read_int64(&mut self, slot: &mut i64) -> Result<usize, WireError> {
        if self.len == 0 {
            return Ok(0);
        }
        let input = self.reader()?;
        let start = input.index();
        *slot = input.read_var_int64()?;
        Ok(input.index() - start)
    }

    pub fn read_float(&mut self, slot: &mut f32) -> Result<usize, WireError> {
        if self.len == 0 {
            return Ok(0);
        }
        let input = self.reader()?;
        let start = input.index();
        *slot = input.read_float()?;
        Ok(input.index() - start)
    }

    pub fn read_string(&mut self, slot: &mut String) -> Result<usize, WireError> {
        if self.len == 0 {
            return Ok(0);
        }
        let input = self.reader()?;
        let start = input.index();
        *slot = input.read_string()?;
        Ok(input.index() - start)
    }

    /// Encode a nested struct value through the registry codec, using the
    /// descriptor resolved for this field.
    pub fn encode_nested(&mut self, value: &dyn Wire) -> Result<usize, WireError> {
        let st = self.st.ok_or(WireError::MissingDescriptor(self.tag))?;
        let registry = self.registry;
        registry.encode_struct_into(st, value, self.writer()?)
    }

    /// Decode a nested struct value in place. Returns `Ok(0)` untouched when
    /// the field is absent.
    pub fn decode_nested(&mut self, value: &mut dyn Wire) -> Result<usize, WireError> {
        if self.len == 0 {
            return Ok(0);
        }
        let st = self.st.ok_or(WireError::MissingDescriptor(self.tag))?;
        let registry = self.registry;
        registry.decode_struct_from(st, value, self.reader()?)
    }
}
