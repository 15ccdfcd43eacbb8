//! KDL descriptor handling for droidconf.
//!
//! This crate handles:
//! - Loading app module descriptors (android/app/build.kdl)
//! - Cross-field validation
//! - Canonical serialization
//! - Variable interpolation

pub mod error;
pub mod loader;
pub mod validate;
pub mod variables;
pub mod writer;

pub use error::{ConfigError, ConfigResult};
pub use loader::{DESCRIPTOR_PATH, DescriptorLoader, load};
pub use validate::validate;
pub use variables::{VariableContext, VariableContextBuilder};
pub use writer::serialize;
