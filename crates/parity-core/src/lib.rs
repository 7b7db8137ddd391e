//! Core contracts for the parity keystore: time source and private key handling.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod clock;
pub mod keys;
