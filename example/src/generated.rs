// @generated by pullwire-compiler. Do not edit.

use std::collections::BTreeMap;
use std::sync::{Once, OnceLock};

use pullwire::schema::StructNode;
use pullwire::{FieldArgs, Registry, Wire, WireError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonPhone {
    pub id: i32,
    pub number: String,
}

impl Wire for PersonPhone {
    fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.write_int32(self.id),
            2 => args.write_string(&self.number),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.read_int32(&mut self.id),
            2 => args.read_string(&mut self.number),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn reset(&mut self) {
        self.id = 0;
        self.number.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub nicknames: Vec<String>,
    pub home: PersonPhone,
    pub book: BTreeMap<i32, PersonPhone>,
}

static PERSON_DESCRIPTOR: OnceLock<&'static StructNode> = OnceLock::new();

impl Person {
    pub fn tag() -> u32 { 0x1 }

    pub fn name() -> &'static str { "Person" }

    pub fn descriptor() -> &'static StructNode {
        registry();
        PERSON_DESCRIPTOR.get().copied().expect("descriptor bound during registry construction")
    }

    fn register(reg: &'static Registry) {
        let st = reg.lookup("Person").expect("embedded schema defines Person");
        let _ = PERSON_DESCRIPTOR.set(st);
    }
}

impl Wire for Person {
    fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.write_string(&self.name),
            2 => args.write_int32(self.age),
            3 => {
                let idx = args.require_idx()? as usize;
                if idx >= self.nicknames.len() {
                    return Err(WireError::NoField { watermark: idx as u32 });
                }
                args.write_string(&self.nicknames[idx])
            }
            4 => args.encode_nested(&self.home),
            5 => {
                let idx = args.require_idx()?;
                if idx == 0 {
                    args.cursor()?.rewind();
                }
                let pos = args.cursor()?.pos();
                match self.book.values().nth(pos) {
                    None => Err(WireError::NoField { watermark: idx }),
                    Some(entry) => {
                        let written = args.encode_nested(entry)?;
                        args.cursor()?.advance();
                        Ok(written)
                    }
                }
            }
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.read_string(&mut self.name),
            2 => args.read_int32(&mut self.age),
            3 => {
                let idx = args.require_idx()? as usize;
                if args.len == 0 {
                    return Ok(0);
                }
                if self.nicknames.len() <= idx {
                    self.nicknames.resize(idx + 1, String::new());
                }
                args.read_string(&mut self.nicknames[idx])
            }
            4 => args.decode_nested(&mut self.home),
            5 => {
                args.require_idx()?;
                if args.len == 0 {
                    return Ok(0);
                }
                let mut entry = PersonPhone::default();
                let consumed = args.decode_nested(&mut entry)?;
                self.book.insert(entry.id, entry);
                Ok(consumed)
            }
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn reset(&mut self) {
        self.name.clear();
        self.age = 0;
        self.nicknames.clear();
        self.home.reset();
        self.book.clear();
    }
}

const SCHEMA_TEXT: &str = "\x2f\x2f\x20\x45\x78\x61\x6d\x70\x6c\x65\x20\x61\x64\x64\x72\x65\x73\x73\x2d\x62\x6f\x6f\x6b\x20\x73\x63\x68\x65\x6d\x61\x2e\x0a\x0a\x73\x74\x72\x75\x63\x74\x20\x50\x65\x72\x73\x6f\x6e\x20\x3d\x20\x30\x78\x30\x31\x20\x7b\x0a\x20\x20\x20\x20\x73\x74\x72\x75\x63\x74\x20\x50\x68\x6f\x6e\x65\x20\x7b\x0a\x20\x20\x20\x20\x20\x20\x20\x20\x69\x64\x3a\x20\x69\x6e\x74\x33\x32\x20\x3d\x20\x31\x3b\x0a\x20\x20\x20\x20\x20\x20\x20\x20\x6e\x75\x6d\x62\x65\x72\x3a\x20\x73\x74\x72\x69\x6e\x67\x20\x3d\x20\x32\x3b\x0a\x20\x20\x20\x20\x7d\x0a\x20\x20\x20\x20\x6e\x61\x6d\x65\x3a\x20\x73\x74\x72\x69\x6e\x67\x20\x3d\x20\x31\x3b\x0a\x20\x20\x20\x20\x61\x67\x65\x3a\x20\x69\x6e\x74\x33\x32\x20\x3d\x20\x32\x3b\x0a\x20\x20\x20\x20\x6e\x69\x63\x6b\x6e\x61\x6d\x65\x73\x3a\x20\x73\x74\x72\x69\x6e\x67\x5b\x5d\x20\x3d\x20\x33\x3b\x0a\x20\x20\x20\x20\x68\x6f\x6d\x65\x3a\x20\x50\x68\x6f\x6e\x65\x20\x3d\x20\x34\x3b\x0a\x20\x20\x20\x20\x62\x6f\x6f\x6b\x3a\x20\x50\x68\x6f\x6e\x65\x5b\x69\x64\x5d\x20\x3d\x20\x35\x3b\x0a\x7d\x0a";

pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    static BIND: Once = Once::new();
    let reg = REGISTRY.get_or_init(|| {
        Registry::from_text(SCHEMA_TEXT).expect("embedded schema text parses")
    });
    BIND.call_once(|| {
        Person::register(reg);
    });
    reg
}
