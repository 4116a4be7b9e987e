pub mod context;
pub mod descriptor;
pub mod diagnostics;
pub mod errors;
pub mod loader;
pub mod record;

pub use context::{EntityContext, ScalarVocabulary, TypeShape};
pub use descriptor::{
    Annotation, AnnotationKind, DeclaredType, EntityDescriptor, ModelDescriptor,
    PropertyDescriptor, PropertyIdentity,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLevel};
pub use errors::{FrozenRecordError, ModelLoadError};
pub use loader::load_model;
pub use record::{ColumnFields, ColumnMetadataRecord, LockOutcome, Slot};
