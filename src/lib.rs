//! pinpack library.
//!
//! Packages one artefact per pinned dependency version: for each configured
//! version the dependency is installed at exactly that version, the
//! project's packaging command runs, and the artefact is renamed to record
//! the version. Used by the `pinpack` binary and usable programmatically
//! with custom [`executor::CommandExecutor`] and [`executor::ArtefactMover`]
//! implementations.
//!
//! # Modules
//!
//! - [`artefact`] - Artefact filename computation
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Layered configuration (defaults, `pinpack.toml`, flags)
//! - [`error`] - Error types
//! - [`executor`] - Command and rename seams to the host system
//! - [`flow`] - End-to-end run orchestration for the binary
//! - [`matrix`] - The version iterator
//! - [`output`] - Progress and dry-run formatting
//! - [`policy`] - Failure policies
//! - [`report`] - Per-version outcomes and the JSON run report
//! - [`step`] - The install, package and rename steps
//! - [`version`] - Validated dependency versions

pub mod artefact;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod flow;
pub mod matrix;
pub mod output;
pub mod policy;
pub mod report;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod version;
