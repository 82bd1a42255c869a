//! Integration test crate for Recut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every recut library crate to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod export;
