//! # Column Metadata Resolver
//!
//! Derives the final mapping of one property by running a fixed table of
//! resolver stages over a [`ColumnMetadataRecord`](crate::metadata::ColumnMetadataRecord).
//!
//! ## Stage Table
//!
//! Stages run in ascending tier; stages sharing a tier run in table order:
//!
//! ```text
//! tier 0  navigation_override     - explicit `navigation` annotation, locks the flag
//! tier 0  column_override         - explicit `column` annotation, locks name/type
//! tier 0  required_override       - explicit `required` annotation, locks is_required
//! tier 1  legacy_foreign_key      - deprecated `foreign_key` annotation
//! tier 2  structural_heuristic    - entity / collection-of-entity declared types
//! tier 2  foreign_key_convention  - `CustomerId` <-> `Customer` pairing
//! tier 3  defaults                - everything still unset
//! ```
//!
//! ## Precedence
//!
//! Tier-0 stages lock what they write. Every other stage writes a field only
//! while it is unset, so a locked field cannot change after tier 0 and
//! re-running the table over the same input always yields the same record.
//!
//! ## Failure Isolation
//!
//! A malformed annotation payload stops the pipeline for that property only.
//! The record is flagged `unresolved`, frozen, and returned alongside the
//! error; the caller moves on to the next property.

pub mod errors;
pub mod logger;
pub mod pipeline;
pub mod stage;
mod stages;
pub mod transformed;

pub use errors::{MalformedAnnotationError, ResolutionError};
pub use logger::{LogEntry, LogSink, MemorySink, ResolutionLogger, TeeSink};
pub use pipeline::{PropertyResolution, ResolutionPipeline, UnresolvedProperty};
pub use stage::{standard_stages, StageDescriptor, StageFn, StageId, StageResult};
pub use transformed::Transformed;
