//! colmeta - Column metadata resolution for entity mappings
//!
//! This crate turns reflected entity property descriptions into finalized
//! column mapping records through:
//! - A statically typed property/annotation model, built once by the caller
//! - An ordered table of resolver stages with explicit precedence
//! - Deprecation and ambiguity diagnostics routed to a logger sink
//! - An entity scanner that isolates per-property failures

pub mod config;
pub mod metadata;
pub mod resolver;
pub mod scanner;

pub use config::ResolverConfig;
pub use metadata::{ColumnMetadataRecord, ModelDescriptor, PropertyDescriptor};
pub use resolver::{ResolutionLogger, ResolutionPipeline};
pub use scanner::EntityScanner;
