//! Protocol-level tests driving hand-written `Wire` implementations shaped
//! exactly like compiler output: match-based dispatchers with an unknown-tag
//! default, index-checked repeated fields, and cursor-driven map fields.

use std::collections::BTreeMap;

use pullwire::{ByteBuffer, FieldArgs, MapCursor, Registry, Wire, WireError, WriteBuffer};

const SCHEMA: &str = r#"
struct Point = 0x01 {
    x: int32 = 1;
    y: int32 = 2;
}

struct Path = 0x02 {
    points: Point[] = 1;
}

struct Atlas = 0x03 {
    struct Site {
        id: int32 = 1;
        label: string = 2;
    }
    sites: Site[id] = 1;
    title: string = 2;
}
"#;

fn registry() -> Registry {
    Registry::from_text(SCHEMA).expect("test schema parses")
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl Wire for Point {
    fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.write_int32(self.x),
            2 => args.write_int32(self.y),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.read_int32(&mut self.x),
            2 => args.read_int32(&mut self.y),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn reset(&mut self) {
        self.x = 0;
        self.y = 0;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Path {
    points: Vec<Point>,
}

impl Wire for Path {
    fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => {
                let idx = args.require_idx()? as usize;
                if idx >= self.points.len() {
                    return Err(WireError::NoField {
                        watermark: idx as u32,
                    });
                }
                args.encode_nested(&self.points[idx])
            }
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => {
                let idx = args.require_idx()? as usize;
                if args.len == 0 {
                    return Ok(0);
                }
                if self.points.len() <= idx {
                    self.points.resize(idx + 1, Point::default());
                }
                args.decode_nested(&mut self.points[idx])
            }
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn reset(&mut self) {
        self.points.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AtlasSite {
    id:    i32,
    label: String,
}

impl Wire for AtlasSite {
    fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.write_int32(self.id),
            2 => args.write_string(&self.label),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => args.read_int32(&mut self.id),
            2 => args.read_string(&mut self.label),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn reset(&mut self) {
        self.id = 0;
        self.label.clear();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Atlas {
    sites: BTreeMap<i32, AtlasSite>,
    title: String,
}

impl Wire for Atlas {
    fn encode_field(&self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => {
                let idx = args.require_idx()?;
                if idx == 0 {
                    args.cursor()?.rewind();
                }
                let pos = args.cursor()?.pos();
                match self.sites.values().nth(pos) {
                    None => Err(WireError::NoField { watermark: idx }),
                    Some(entry) => {
                        let written = args.encode_nested(entry)?;
                        args.cursor()?.advance();
                        Ok(written)
                    }
                }
            }
            2 => args.write_string(&self.title),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn decode_field(&mut self, args: &mut FieldArgs<'_, '_>) -> Result<usize, WireError> {
        match args.tag {
            1 => {
                args.require_idx()?;
                if args.len == 0 {
                    return Ok(0);
                }
                let mut entry = AtlasSite::default();
                let consumed = args.decode_nested(&mut entry)?;
                self.sites.insert(entry.id, entry);
                Ok(consumed)
            }
            2 => args.read_string(&mut self.title),
            tag => Err(WireError::UnknownTag(tag)),
        }
    }

    fn reset(&mut self) {
        self.sites.clear();
        self.title.clear();
    }
}

#[test]
fn point_round_trip() {
    let reg = registry();
    let point = Point { x: 5, y: 7 };
    let bytes = reg.encode("Point", &point).expect("encode failed");

    let mut back = Point::default();
    let consumed = reg.decode("Point", &mut back, &bytes).expect("decode failed");
    assert_eq!(consumed, bytes.len());
    assert_eq!(back, point);
}

#[test]
fn point_encode_single_field() {
    let reg = registry();
    let point = Point { x: 5, y: 7 };
    let mut out = WriteBuffer::new();
    let mut args = FieldArgs::write(&reg, 1, &mut out);
    let written = point.encode_field(&mut args).expect("encode_field failed");
    assert!(written > 0);
    let mut bb = ByteBuffer::new(out.as_slice());
    assert_eq!(bb.read_var_int(), Ok(5));
}

#[test]
fn unknown_tag_is_a_protocol_error() {
    let reg = registry();
    let point = Point { x: 5, y: 7 };
    let mut out = WriteBuffer::new();
    let mut args = FieldArgs::write(&reg, 3, &mut out);
    assert_eq!(
        point.encode_field(&mut args),
        Err(WireError::UnknownTag(3))
    );
}

#[test]
fn absent_decode_leaves_value_unchanged() {
    let reg = registry();
    let mut point = Point { x: 5, y: 7 };
    let mut bb = ByteBuffer::new(&[]);
    let mut args = FieldArgs::read(&reg, 2, &mut bb).with_len(0);
    assert_eq!(point.decode_field(&mut args), Ok(0));
    assert_eq!(point.y, 7);
}

#[test]
fn indexed_enumeration_terminates_with_watermark() {
    let reg = registry();
    let path = Path {
        points: vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }],
    };
    let st = reg.lookup("Point").expect("Point descriptor");

    let mut out = WriteBuffer::new();
    for idx in 0..2 {
        let mut args = FieldArgs::write(&reg, 1, &mut out)
            .with_idx(idx)
            .with_descriptor(st);
        assert!(path.encode_field(&mut args).is_ok(), "idx {idx}");
    }
    for _ in 0..2 {
        // Index L keeps reporting NoField with watermark L.
        let mut args = FieldArgs::write(&reg, 1, &mut out)
            .with_idx(2)
            .with_descriptor(st);
        assert_eq!(
            path.encode_field(&mut args),
            Err(WireError::NoField { watermark: 2 })
        );
    }
}

#[test]
fn indexed_requires_an_index() {
    let reg = registry();
    let path = Path::default();
    let mut out = WriteBuffer::new();
    let mut args = FieldArgs::write(&reg, 1, &mut out);
    assert_eq!(
        path.encode_field(&mut args),
        Err(WireError::MissingIndex(1))
    );
}

#[test]
fn path_round_trip() {
    let reg = registry();
    let path = Path {
        points: vec![Point { x: 1, y: -2 }, Point { x: 30, y: 40 }],
    };
    let bytes = reg.encode("Path", &path).expect("encode failed");
    let mut back = Path::default();
    reg.decode("Path", &mut back, &bytes).expect("decode failed");
    assert_eq!(back, path);
}

#[test]
fn empty_path_round_trip() {
    let reg = registry();
    let path = Path::default();
    let bytes = reg.encode("Path", &path).expect("encode failed");
    let mut back = Path {
        points: vec![Point { x: 9, y: 9 }],
    };
    // Absent repeated field leaves the destination untouched.
    reg.decode("Path", &mut back, &bytes).expect("decode failed");
    assert_eq!(back.points.len(), 1);
}

fn sample_atlas() -> Atlas {
    let mut atlas = Atlas {
        title: "sample".to_string(),
        ..Atlas::default()
    };
    for (id, label) in [(3, "c"), (1, "a"), (2, "b")] {
        atlas.sites.insert(
            id,
            AtlasSite {
                id,
                label: label.to_string(),
            },
        );
    }
    atlas
}

#[test]
fn map_enumeration_terminates_and_restarts() {
    let reg = registry();
    let atlas = sample_atlas();
    let st = reg.lookup("Atlas.Site").expect("Atlas.Site descriptor");
    let mut cursor = MapCursor::new();

    let mut first_pass = Vec::new();
    let mut out = WriteBuffer::new();
    for idx in 0..3u32 {
        let before = out.len();
        let mut args = FieldArgs::write(&reg, 1, &mut out)
            .with_idx(idx)
            .with_descriptor(st)
            .with_cursor(&mut cursor);
        atlas.encode_field(&mut args).expect("encode_field failed");
        first_pass.push(out.as_slice()[before..].to_vec());
    }
    let mut args = FieldArgs::write(&reg, 1, &mut out)
        .with_idx(3)
        .with_descriptor(st)
        .with_cursor(&mut cursor);
    assert_eq!(
        atlas.encode_field(&mut args),
        Err(WireError::NoField { watermark: 3 })
    );

    // A later idx 0 call rewinds and the pass is deterministic.
    let mut second_pass = Vec::new();
    let mut out2 = WriteBuffer::new();
    for idx in 0..3u32 {
        let before = out2.len();
        let mut args = FieldArgs::write(&reg, 1, &mut out2)
            .with_idx(idx)
            .with_descriptor(st)
            .with_cursor(&mut cursor);
        atlas.encode_field(&mut args).expect("encode_field failed");
        second_pass.push(out2.as_slice()[before..].to_vec());
    }
    assert_eq!(first_pass, second_pass);
}

#[test]
fn map_requires_a_cursor() {
    let reg = registry();
    let atlas = sample_atlas();
    let st = reg.lookup("Atlas.Site").expect("Atlas.Site descriptor");
    let mut out = WriteBuffer::new();
    let mut args = FieldArgs::write(&reg, 1, &mut out)
        .with_idx(0)
        .with_descriptor(st);
    assert_eq!(
        atlas.encode_field(&mut args),
        Err(WireError::MissingCursor(1))
    );
}

#[test]
fn atlas_round_trip() {
    let reg = registry();
    let atlas = sample_atlas();
    let bytes = reg.encode("Atlas", &atlas).expect("encode failed");
    let mut back = Atlas::default();
    reg.decode("Atlas", &mut back, &bytes).expect("decode failed");
    assert_eq!(back, atlas);
}

#[test]
fn map_decode_is_last_write_wins() {
    let reg = registry();
    let atlas = sample_atlas();
    let bytes = reg.encode("Atlas", &atlas).expect("encode failed");
    let mut back = Atlas::default();
    back.sites.insert(
        2,
        AtlasSite {
            id:    2,
            label: "stale".to_string(),
        },
    );
    reg.decode("Atlas", &mut back, &bytes).expect("decode failed");
    assert_eq!(back.sites[&2].label, "b");
}

#[test]
fn reset_is_idempotent() {
    let mut atlas = sample_atlas();
    atlas.reset();
    let once = atlas.clone();
    atlas.reset();
    assert_eq!(atlas, once);
    assert_eq!(atlas, Atlas::default());
}

#[test]
fn decode_unknown_wire_tag_fails() {
    let reg = registry();
    // field_count 1, tag 9 — Point has no tag 9.
    let mut back = Point::default();
    assert_eq!(
        reg.decode("Point", &mut back, &[1, 9]),
        Err(WireError::UnknownTag(9))
    );
}

#[test]
fn unknown_struct_name_is_rejected() {
    let reg = registry();
    let point = Point::default();
    assert_eq!(
        reg.encode("Nowhere", &point),
        Err(WireError::UnknownStruct("Nowhere".to_string()))
    );
}

#[test]
fn partial_decode_leaves_partial_growth() {
    let reg = registry();
    let path = Path {
        points: vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }],
    };
    let bytes = reg.encode("Path", &path).expect("encode failed");
    // Chop the buffer mid-element: decode fails, but the first element
    // already landed. Callers own whole-message recovery.
    let mut back = Path::default();
    let result = reg.decode("Path", &mut back, &bytes[..bytes.len() - 1]);
    assert!(result.is_err());
    assert!(!back.points.is_empty());
}
