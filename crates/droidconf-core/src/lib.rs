//! Core domain types and traits for droidconf.
//!
//! This crate contains:
//! - The resolved project descriptor and its sections
//! - Closed enums for build types and Java language levels
//! - Dependency coordinates
//! - Package identifier checks
//! - The version provider abstraction

pub mod build_type;
pub mod dependency;
pub mod descriptor;
pub mod error;
pub mod identifier;
pub mod java;
pub mod provider;

pub use build_type::{BuildTypeName, BuildTypeProfile};
pub use dependency::{Coordinate, DependencySpec};
pub use descriptor::{
    CompileOptions, DefaultConfig, FlutterConfig, KotlinOptions, ProjectDescriptor, SigningConfig,
};
pub use error::{Error, Result};
pub use java::JavaVersion;
pub use provider::{LocalProperties, StaticVersions, VersionProvider};
