//! Interactive in-memory folder tree with JSON snapshot persistence.

#![allow(clippy::enum_variant_names)]

pub mod application;
pub mod cli;
pub mod config;
mod ext;
pub mod shell;
pub mod snapshot;
pub mod tree;
