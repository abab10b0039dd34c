//! Integration test crate for Slidecut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the core, timeline and media crates to verify they work together.

#[cfg(test)]
mod slideshow;

#[cfg(test)]
mod export;
