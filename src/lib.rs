//! Unpack and package JavaScript zip bundles (`jszip` artifacts)
//!
//! Two independent build steps operate on a [`Project`] loaded from a
//! `jszip.toml` manifest:
//!
//! - [`unpack()`] extracts every direct, `runtime`-scoped `jszip` dependency
//!   into a staging directory.
//! - [`package()`] zips a content directory (`src/main/js` by default) together
//!   with the project descriptor and a generated `pom.properties`, then
//!   registers the archive against the project.
//!
//! # Example
//!
//! ```no_run
//! use jszip::{manifest, package, unpack};
//! use std::path::Path;
//!
//! let (manifest, mut project) = manifest::load(Path::new("jszip.toml"))?;
//!
//! let unpack_config = manifest.unpack_config(&project);
//! unpack::unpack(&project, &unpack_config)?;
//!
//! let package_config = manifest.package_config(&project);
//! let report = package::package(&mut project, &package_config)?;
//! println!("built {}", report.file.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod archive;
pub mod core;
pub mod filter;
pub mod manifest;
pub mod package;
pub mod project;
pub mod unpack;

pub use crate::core::output;
pub use package::{package, PackageConfig, PackageError, PackageReport};
pub use project::{Artifact, Coordinates, Project, Scope};
pub use unpack::{unpack, UnpackConfig, UnpackError, UnpackReport};

/// Packaging type of JavaScript zip bundles.
pub const JSZIP_TYPE: &str = "jszip";
