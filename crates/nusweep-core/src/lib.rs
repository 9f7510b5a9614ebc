//! nusweep Core — usage-detection engine for NuGet package references.
//!
//! This crate decides, per declared package reference, whether any of the
//! package's published namespaces is referenced from a project's source
//! files. Detection is lexical by design: explicit using statements, alias
//! resolution, qualified-name prefixes, and an ambient-signature table for
//! globally-imported packages. File access and namespace metadata come in
//! through the collaborator traits in [`providers`].

pub mod ambient;
pub mod analyzer;
pub mod cancel;
pub mod error;
pub mod model;
pub mod pattern;
pub mod providers;
pub mod scanner;
