//! CPU-core unit tests.



/// Power-on reset semantics.
pub mod reset;
