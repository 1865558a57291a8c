//! Shared test infrastructure: image building and execution harness.

/// Instruction encoders and the flash-image builder.
pub mod builder;



pub use builder::ImageBuilder;
pub use harness::TestContext;
