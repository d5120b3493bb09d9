//! DevTools Assembler
//!
//! Builds the DevTools browser extension package by combining a local
//! override tree with files fetched from the upstream ScratchAddons
//! repository: helper libraries, the `editor-devtools` addon, every
//! available translation, and the upstream manifest version.

pub mod assemble;
pub mod config;
pub mod error;
pub mod fetch;
pub mod l10n;
pub mod logging;
pub mod manifest;
pub mod staging;
pub mod tooling;
pub mod upstream;

pub use assemble::{Assembler, AssemblyReport};
pub use error::BuildError;
