//! Adapter implementations for agreement ports.

pub mod filesystem;
pub mod memory;
mod naming;
pub mod postgres;

pub use naming::SIGNATURE_PATH;
