//! CLI command implementations.

pub mod build;
pub mod doctor;
pub mod emit;
pub mod init;
pub mod symbols;
