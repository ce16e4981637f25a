//! Core data structures.
//!
//! - Host platform description
//! - Fixed project layout of a wren.go checkout

pub mod layout;
pub mod platform;

pub use layout::Layout;
pub use platform::{PlatformDescriptor, PlatformFamily};
