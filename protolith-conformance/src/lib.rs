//! Generated-code scenarios live in `generated`, compiled from
//! `proto/scenarios.proto` by `build.rs` at build time — the same
//! `include!(concat!(env!("OUT_DIR"), ...))` pattern protoc-rust's own
//! consumers use, just without a `protoc` subprocess behind it.

#[allow(dead_code, non_camel_case_types)]
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/scenarios.rs"));
}

pub use generated::*;
