//! Application services layer.

pub mod error;
pub mod qrcode;
pub mod stream;
