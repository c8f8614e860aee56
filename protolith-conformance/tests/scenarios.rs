//! Scenario tests S1-S6 from the protolith specification, run against the
//! real generated code in `src/lib.rs` (compiled from
//! `proto/scenarios.proto`) rather than against hand-written stand-ins.

use protolith::{CursorStream, Message};
use protolith_conformance::{
    Basic, BasicInit, OneofDemo, OneofDemoC, OneofDemoInit, Outer, OuterInit, Outer_Inner,
    Outer_InnerInit, RepeatedInts, RepeatedIntsInit,
};

fn encode<M: Message>(msg: &M) -> Vec<u8> {
    let mut stream = CursorStream::new();
    msg.write_to(&mut stream);
    stream.into_vec()
}

/// S1: `init_M(n = 150)` encodes to `08 96 01`; `t` stays unset.
#[test]
fn s1_scalar_field_and_absent_string() {
    let msg = Basic::new(BasicInit {
        n: Some(150),
        t: None,
        raw: None,
    });
    assert_eq!(encode(&msg), vec![0x08, 0x96, 0x01]);

    let mut stream = CursorStream::from_bytes(encode(&msg));
    let decoded = Basic::read_from(&mut stream, 3).unwrap();
    assert!(decoded.has_n());
    assert_eq!(decoded.n, Some(150));
    assert!(!decoded.has_t());
}

/// S2: an explicitly-set zero value is still written — presence, not the
/// scalar's own value, decides whether a field appears on the wire.
#[test]
fn s2_explicit_zero_is_still_present() {
    let msg = Basic::new(BasicInit {
        n: Some(0),
        t: None,
        raw: None,
    });
    assert_eq!(encode(&msg), vec![0x08, 0x00]);
}

/// S3: a repeated varint field packs on write; decode accepts either the
/// packed layout or one tag per element.
#[test]
fn s3_repeated_scalar_is_packed_on_write() {
    let msg = RepeatedInts::new(RepeatedIntsInit { xs: vec![1, 2, 3] });
    assert_eq!(encode(&msg), vec![0x0a, 0x03, 0x01, 0x02, 0x03]);
}

#[test]
fn s3_repeated_scalar_accepts_unpacked_layout_on_read() {
    let unpacked = vec![0x08, 0x01, 0x08, 0x02, 0x08, 0x03];
    let mut stream = CursorStream::from_bytes(unpacked.clone());
    let decoded = RepeatedInts::read_from(&mut stream, unpacked.len() as u32).unwrap();
    assert_eq!(decoded.xs, vec![1, 2, 3]);
}

/// S4: a nested sub-message is embedded length-delimited and round-trips.
#[test]
fn s4_nested_message_round_trips() {
    let inner = Outer_Inner::new(Outer_InnerInit { a: Some(7) });
    let msg = Outer::new(OuterInit {
        i: Some(Box::new(inner)),
    });
    assert_eq!(encode(&msg), vec![0x0a, 0x02, 0x08, 0x07]);

    let bytes = encode(&msg);
    let mut stream = CursorStream::from_bytes(bytes.clone());
    let decoded = Outer::read_from(&mut stream, bytes.len() as u32).unwrap();
    assert_eq!(decoded.i.unwrap().a, Some(7));
}

/// S5: setting one oneof member after another leaves only the last one
/// present on the wire; decoding yields the same active variant.
#[test]
fn s5_oneof_keeps_only_the_last_member_set() {
    let msg = OneofDemo::new(OneofDemoInit {
        c: Some(OneofDemoC::B("x".to_owned())),
    });
    assert!(msg.has_c());
    match &msg.c {
        Some(OneofDemoC::B(s)) => assert_eq!(s, "x"),
        other => panic!("expected B variant, got {:?}", other),
    }

    let bytes = encode(&msg);
    // tag for field 2 (wire type 2, length-delimited): (2 << 3) | 2 = 0x12
    assert_eq!(bytes[0], 0x12);

    let mut stream = CursorStream::from_bytes(bytes.clone());
    let decoded = OneofDemo::read_from(&mut stream, bytes.len() as u32).unwrap();
    match decoded.c {
        Some(OneofDemoC::B(s)) => assert_eq!(s, "x"),
        other => panic!("expected B variant, got {:?}", other),
    }
}

/// A string field and a bytes field both round-trip through `write_to`/
/// `read_from` without moving a non-`Copy` value out of its reference.
#[test]
fn string_and_bytes_fields_round_trip() {
    let msg = Basic::new(BasicInit {
        n: None,
        t: Some("hello".to_owned()),
        raw: Some(vec![1, 2, 3]),
    });
    let bytes = encode(&msg);
    let mut stream = CursorStream::from_bytes(bytes.clone());
    let decoded = Basic::read_from(&mut stream, bytes.len() as u32).unwrap();
    assert_eq!(decoded.t, Some("hello".to_owned()));
    assert_eq!(decoded.raw, Some(vec![1, 2, 3]));
}

/// Invariant 2: `write_to`'s return value agrees with `encoded_len`.
#[test]
fn length_agreement() {
    let msg = Basic::new(BasicInit {
        n: Some(300),
        t: Some("hello".to_owned()),
        raw: Some(vec![1, 2, 3]),
    });
    let mut stream = CursorStream::new();
    let written = msg.write_to(&mut stream);
    assert_eq!(written as u32, msg.encoded_len());
    assert_eq!(stream.as_bytes().len(), written);
}

/// Invariant 3: presence fidelity across `new`, `has_*`, and `reset_*`.
#[test]
fn presence_fidelity() {
    let mut msg = Basic::new(BasicInit {
        n: Some(5),
        t: None,
        raw: None,
    });
    assert!(msg.has_n());
    assert!(!msg.has_t());

    msg.reset_n();
    assert!(!msg.has_n());
    assert_eq!(msg.n, None);
}

/// Invariant 3 (continued): the presence-checked `get_<field>` hook fails
/// with the named presence error once a field is reset, and succeeds while
/// it's set.
#[test]
fn get_hook_raises_presence_error_when_unset() {
    let mut msg = Basic::new(BasicInit {
        n: Some(5),
        t: None,
        raw: None,
    });
    assert_eq!(msg.get_n(), Ok(&5));
    assert_eq!(msg.get_t(), Err(protolith::PresenceError { field: "t" }));

    msg.reset_n();
    assert_eq!(msg.get_n(), Err(protolith::PresenceError { field: "n" }));
}

/// The same presence-checked hook exists for a oneof's selector field.
#[test]
fn oneof_get_hook_raises_presence_error_when_unset() {
    let msg = OneofDemo::new(OneofDemoInit { c: None });
    assert_eq!(msg.get_c(), Err(protolith::PresenceError { field: "c" }));

    let msg = OneofDemo::new(OneofDemoInit {
        c: Some(OneofDemoC::A(1)),
    });
    assert_eq!(msg.get_c(), Ok(&OneofDemoC::A(1)));
}

/// Invariant 5: a message decoded from bytes containing an extra,
/// undeclared field equals the message decoded without it.
#[test]
fn unknown_field_is_skipped() {
    let msg = Basic::new(BasicInit {
        n: Some(1),
        t: None,
        raw: None,
    });
    let plain = encode(&msg);

    // Splice in an unknown varint field (number 99, wire type 0) ahead of
    // the known field.
    let mut with_unknown = Vec::new();
    let tag = protolith::wire::make_tag(99, protolith::WireType::Varint);
    let mut tag_stream = CursorStream::new();
    protolith::varint::write_varint(&mut tag_stream, tag as u64);
    protolith::varint::write_varint(&mut tag_stream, 42);
    with_unknown.extend_from_slice(tag_stream.as_bytes());
    with_unknown.extend_from_slice(&plain);

    let mut stream = CursorStream::from_bytes(with_unknown.clone());
    let decoded = Basic::read_from(&mut stream, with_unknown.len() as u32).unwrap();

    let mut plain_stream = CursorStream::from_bytes(plain.clone());
    let decoded_plain = Basic::read_from(&mut plain_stream, plain.len() as u32).unwrap();

    assert_eq!(decoded, decoded_plain);
}

/// S6: reserving a field's name or number and declaring a field that
/// collides with either fails validation; moving the field to a free
/// number succeeds.
#[test]
fn s6_reserved_name_and_number_enforcement() {
    let colliding_number = r#"
        syntax = "proto3";
        message M {
            int32 n = 1;
            reserved 2, 4 to 6;
            reserved "old";
            int32 old = 3;
        }
    "#;
    assert!(protolith_codegen::compile(colliding_number).is_err());

    let colliding_reserved_range = r#"
        syntax = "proto3";
        message M {
            int32 n = 1;
            reserved 2, 4 to 6;
            reserved "old";
            int32 fresh = 5;
        }
    "#;
    assert!(protolith_codegen::compile(colliding_reserved_range).is_err());

    let free_number = r#"
        syntax = "proto3";
        message M {
            int32 n = 1;
            reserved 2, 4 to 6;
            reserved "old";
            int32 fresh = 7;
        }
    "#;
    assert!(protolith_codegen::compile(free_number).is_ok());
}
