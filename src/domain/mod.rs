//! Domain layer types and invariants.

pub mod error;
pub mod input;
pub mod qr;
