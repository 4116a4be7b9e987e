//! Entity-wide context handed read-only to every resolver stage.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use lazy_static::lazy_static;

use super::descriptor::{
    AnnotationKind, DeclaredType, EntityDescriptor, ModelDescriptor, PropertyDescriptor,
    PropertyIdentity,
};

lazy_static! {
    // Compared case-insensitively.
    static ref BUILTIN_SCALARS: HashSet<&'static str> = [
        "bool", "boolean", "byte", "sbyte", "short", "ushort", "int", "uint", "long", "ulong",
        "i8", "i16", "i32", "i64", "i128", "u8", "u16", "u32", "u64", "u128", "f32", "f64",
        "float", "double", "decimal", "char", "string", "str", "text", "guid", "uuid", "date",
        "time", "datetime", "datetimeoffset", "timespan", "bytes", "byte[]", "json",
    ]
    .into_iter()
    .collect();
}

/// Shape of a declared type relative to the mapped model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    /// A mapped entity type, or a collection of one.
    Entity,
    /// A recognised scalar type, or a collection of one.
    Scalar,
    /// Neither; no structural signal is available.
    Unknown,
}

/// Scalar type names recognised by the structural heuristic.
#[derive(Debug, Clone, Default)]
pub struct ScalarVocabulary {
    extra: BTreeSet<String>,
}

impl ScalarVocabulary {
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra: extra
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, type_name: &str) -> bool {
        let lowered = type_name.to_lowercase();
        BUILTIN_SCALARS.contains(lowered.as_str()) || self.extra.contains(&lowered)
    }
}

/// Read-only facts about the entity whose property is being resolved.
///
/// Built once per entity by the scanner. Stages may consult it but never
/// depend on the order in which sibling properties are resolved.
#[derive(Debug, Clone)]
pub struct EntityContext {
    entity: String,
    entity_types: BTreeSet<String>,
    properties: BTreeMap<String, DeclaredType>,
    explicit_navigation: BTreeMap<String, bool>,
    key_property: Option<String>,
    scalars: ScalarVocabulary,
}

impl EntityContext {
    pub fn new(
        entity: &EntityDescriptor,
        model: &ModelDescriptor,
        scalars: ScalarVocabulary,
    ) -> Self {
        let entity_types = model.entities.iter().map(|e| e.name.clone()).collect();
        let properties = entity
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.declared_type.clone()))
            .collect();
        let explicit_navigation = entity
            .properties
            .iter()
            .filter_map(|p| {
                // Last declared boolean wins, as in the override stage.
                p.annotations_of(&AnnotationKind::Navigation)
                    .filter_map(|(_, a)| a.value.as_bool())
                    .last()
                    .map(|value| (p.name.clone(), value))
            })
            .collect();

        Self {
            entity: entity.name.clone(),
            entity_types,
            properties,
            explicit_navigation,
            key_property: find_key_property(entity),
            scalars,
        }
    }

    pub fn identity_of(&self, property: &PropertyDescriptor) -> PropertyIdentity {
        PropertyIdentity::new(self.entity.clone(), property.name.clone())
    }

    pub fn is_entity_type(&self, type_name: &str) -> bool {
        self.entity_types.contains(type_name)
    }

    pub fn shape_of(&self, declared: &DeclaredType) -> TypeShape {
        if self.is_entity_type(&declared.name) {
            TypeShape::Entity
        } else if self.scalars.contains(&declared.name) {
            TypeShape::Scalar
        } else {
            TypeShape::Unknown
        }
    }

    /// Case-insensitive sibling lookup, returning the declared spelling.
    pub fn sibling_ignore_case(&self, name: &str) -> Option<(&str, &DeclaredType)> {
        self.properties
            .iter()
            .find(|(sibling, _)| sibling.eq_ignore_ascii_case(name))
            .map(|(sibling, ty)| (sibling.as_str(), ty))
    }

    /// The `navigation` override a sibling declares, if any.
    pub fn explicit_navigation(&self, name: &str) -> Option<bool> {
        self.explicit_navigation.get(name).copied()
    }

    pub fn has_primary_key(&self) -> bool {
        self.key_property.is_some()
    }

    pub fn key_property(&self) -> Option<&str> {
        self.key_property.as_deref()
    }
}

/// An explicit `key` annotation wins; otherwise `Id` or `<Entity>Id` by convention.
fn find_key_property(entity: &EntityDescriptor) -> Option<String> {
    if let Some(explicit) = entity
        .properties
        .iter()
        .find(|p| p.has_annotation(&AnnotationKind::Key))
    {
        return Some(explicit.name.clone());
    }

    let conventional = format!("{}id", entity.name.to_lowercase());
    entity
        .properties
        .iter()
        .find(|p| {
            let lowered = p.name.to_lowercase();
            lowered == "id" || lowered == conventional
        })
        .map(|p| p.name.clone())
}
