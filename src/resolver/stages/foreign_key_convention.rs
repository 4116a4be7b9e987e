//! Tier 2: pair scalar key columns with the reference they back by name.
//!
//! `CustomerId` / `customer_id` next to an entity-typed `Customer` are
//! associated in both directions; both sides derive the pairing from the same
//! key-column pattern. Collections, the entity's own key and references
//! explicitly overridden to scalars are never paired. Only fills an unset
//! association.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    metadata::{ColumnMetadataRecord, DeclaredType, EntityContext, PropertyDescriptor, TypeShape},
    resolver::{stage::StageResult, transformed::Transformed},
};

lazy_static! {
    // `<Nav>Id`, `<Nav>ID`, `<nav>_id`; `<nav>` may itself contain underscores.
    static ref KEY_COLUMN: Regex =
        Regex::new(r"^(?P<nav>[A-Za-z][A-Za-z0-9_]*?)_?(?i:id)$").expect("valid regex");
}

const KEY_SUFFIXES: [&str; 2] = ["Id", "_id"];

pub fn apply(
    record: &mut ColumnMetadataRecord,
    property: &PropertyDescriptor,
    ctx: &EntityContext,
) -> StageResult<Transformed> {
    if !record.fields().foreign_key_association.is_unset() {
        return Ok(Transformed::No);
    }

    let partner = if record.is_navigation_property() == Some(true) {
        key_column_for(property, ctx)
    } else {
        reference_for(property, ctx)
    };

    match partner {
        Some(partner) => {
            let fields = record.fields_mut()?;
            Ok(Transformed::from(fields.foreign_key_association.fill(partner)))
        }
        None => Ok(Transformed::No),
    }
}

/// Navigation side: `Customer` -> a scalar `CustomerId` sibling.
fn key_column_for(property: &PropertyDescriptor, ctx: &EntityContext) -> Option<String> {
    if property.declared_type.collection {
        return None;
    }

    KEY_SUFFIXES.iter().find_map(|suffix| {
        let candidate = format!("{}{}", property.name, suffix);
        let (name, ty) = ctx.sibling_ignore_case(&candidate)?;
        let backs_property = referenced_name(name)
            .is_some_and(|nav| nav.eq_ignore_ascii_case(&property.name));
        (is_key_column(name, ty, ctx) && backs_property).then(|| name.to_string())
    })
}

/// Scalar side: `CustomerId` -> an entity-typed `Customer` sibling.
fn reference_for(property: &PropertyDescriptor, ctx: &EntityContext) -> Option<String> {
    if !is_key_column(&property.name, &property.declared_type, ctx) {
        return None;
    }

    let navigation = referenced_name(&property.name)?;
    let (name, ty) = ctx.sibling_ignore_case(navigation)?;
    if name == property.name || ty.collection {
        return None;
    }

    let is_reference = ctx
        .explicit_navigation(name)
        .unwrap_or_else(|| ctx.is_entity_type(&ty.name));
    is_reference.then(|| name.to_string())
}

/// A scalar, non-collection column other than the entity's own key.
fn is_key_column(name: &str, ty: &DeclaredType, ctx: &EntityContext) -> bool {
    !ty.collection
        && ctx.shape_of(ty) != TypeShape::Entity
        && ctx.key_property() != Some(name)
}

/// `ship_to_id` -> `ship_to`, `CustomerId` -> `Customer`.
fn referenced_name(column: &str) -> Option<&str> {
    KEY_COLUMN
        .captures(column)
        .and_then(|captures| captures.name("nav"))
        .map(|nav| nav.as_str())
}
