//! # Domain Layer
//!
//! Core types shared by every rewire crate.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`constants`] | Format and marker constants |
//! | [`value_objects`] | Runtime values and injection points |
//! | [`ports`] | Provider and configuration-object contracts |
//! | [`module`] | The RWM binary module format: IR, codec and builder |
//!
//! This crate has no knowledge of registries, linkage or the filesystem.

pub mod constants;
pub mod error;
pub mod module;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{InjectionPoint, Instance, Value};
