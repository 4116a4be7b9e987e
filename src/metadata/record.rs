//! Column metadata record
//!
//! The accumulator the resolver stages read and write. A record starts with
//! every field `Unset`, is threaded through the stage list, and is frozen by
//! `finalize()`. After that every mutator returns [`FrozenRecordError`].
//!
//! Field writes follow two rules:
//! - `Slot::fill` writes only an unset field (tiers 1-3).
//! - `Slot::lock` always writes and locks the field (tier 0 overrides). A
//!   locked field ignores every later `fill`.

use serde::{Serialize, Serializer};

use super::{descriptor::PropertyIdentity, diagnostics::Diagnostic, errors::FrozenRecordError};

/// Tri-state field cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot<T> {
    #[default]
    Unset,
    Set(T),
    /// Set by an explicit override. `origin` is the declaration index of the
    /// annotation that produced the value.
    Locked { value: T, origin: usize },
}

/// Result of an explicit override write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome<T> {
    /// The field was unset or only filled by a weaker stage.
    Locked,
    /// Already locked to the same value.
    Agreed,
    /// Already locked to a different value declared earlier; the new value won.
    Overrode { previous: T },
    /// Already locked to a different value declared later; the new value lost.
    Rejected { kept: T },
}

impl<T: Clone + PartialEq> Slot<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Slot::Unset => None,
            Slot::Set(value) | Slot::Locked { value, .. } => Some(value),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Slot::Unset)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Slot::Locked { .. })
    }

    /// Writes `value` only if the field is unset. Returns whether it wrote.
    pub fn fill(&mut self, value: T) -> bool {
        if self.is_unset() {
            *self = Slot::Set(value);
            true
        } else {
            false
        }
    }

    /// Explicit override write. Between two disagreeing locks the one with the
    /// larger declaration index wins, regardless of which stage wrote first.
    pub fn lock(&mut self, value: T, origin: usize) -> LockOutcome<T> {
        match self {
            Slot::Locked {
                value: current,
                origin: current_origin,
            } => {
                if *current == value {
                    *current_origin = (*current_origin).max(origin);
                    LockOutcome::Agreed
                } else if origin >= *current_origin {
                    let previous = std::mem::replace(current, value);
                    *current_origin = origin;
                    LockOutcome::Overrode { previous }
                } else {
                    LockOutcome::Rejected {
                        kept: current.clone(),
                    }
                }
            }
            _ => {
                *self = Slot::Locked { value, origin };
                LockOutcome::Locked
            }
        }
    }
}

impl<T: Serialize + Clone + PartialEq> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// The resolvable mapping fields of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnFields {
    pub is_navigation_property: Slot<bool>,
    pub foreign_key_association: Slot<String>,
    pub column_name: Slot<String>,
    pub column_type: Slot<String>,
    pub is_required: Slot<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMetadataRecord {
    identity: PropertyIdentity,
    #[serde(flatten)]
    fields: ColumnFields,
    diagnostics: Vec<Diagnostic>,
    unresolved: bool,
    #[serde(skip)]
    frozen: bool,
}

impl ColumnMetadataRecord {
    pub fn new(identity: PropertyIdentity) -> Self {
        Self {
            identity,
            fields: ColumnFields::default(),
            diagnostics: Vec::new(),
            unresolved: false,
            frozen: false,
        }
    }

    pub fn identity(&self) -> &PropertyIdentity {
        &self.identity
    }

    pub fn fields(&self) -> &ColumnFields {
        &self.fields
    }

    /// Mutable access to the field slots; fails once the record is frozen.
    pub fn fields_mut(&mut self) -> Result<&mut ColumnFields, FrozenRecordError> {
        self.ensure_mutable()?;
        Ok(&mut self.fields)
    }

    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) -> Result<(), FrozenRecordError> {
        self.ensure_mutable()?;
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    pub fn mark_unresolved(&mut self) -> Result<(), FrozenRecordError> {
        self.ensure_mutable()?;
        self.unresolved = true;
        Ok(())
    }

    /// Freezes the record. Calling it twice is harmless.
    pub fn finalize(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn is_unresolved(&self) -> bool {
        self.unresolved
    }

    pub fn is_navigation_property(&self) -> Option<bool> {
        self.fields.is_navigation_property.value().copied()
    }

    pub fn foreign_key_association(&self) -> Option<&str> {
        self.fields.foreign_key_association.value().map(String::as_str)
    }

    pub fn column_name(&self) -> Option<&str> {
        self.fields.column_name.value().map(String::as_str)
    }

    pub fn column_type(&self) -> Option<&str> {
        self.fields.column_type.value().map(String::as_str)
    }

    pub fn is_required(&self) -> Option<bool> {
        self.fields.is_required.value().copied()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn ensure_mutable(&self) -> Result<(), FrozenRecordError> {
        if self.frozen {
            Err(FrozenRecordError {
                identity: self.identity.clone(),
            })
        } else {
            Ok(())
        }
    }
}
