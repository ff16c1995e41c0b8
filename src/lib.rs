//! Tessera turns text, URLs, and email addresses into QR-code images and
//! streams them over HTTP as PNG or SVG.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
