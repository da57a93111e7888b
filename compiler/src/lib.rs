//! pullwire-compiler
//!
//! This crate implements the back half of the pullwire pipeline:
//!  1) A structured statement IR with a rendering pass (`ir`),
//!  2) Per-field codegen rules for the pull enumeration protocol (`rules`),
//!  3) A post-order tree walker owning the per-session visited/defined state
//!     and the registration list (`walker`),
//!  4) Global assembly: unit concatenation, the registry singleton, and the
//!     embedded schema literal (`assembly`),
//!  5) Naming/scoping helpers (`naming`) and `CodegenError`.

pub mod assembly;
pub mod error;
pub mod ir;
pub mod naming;
pub mod rules;
pub mod walker;

pub use assembly::{generate, generate_from_text, GenOptions};
pub use error::CodegenError;
