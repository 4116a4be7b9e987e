//! Tier 2: infer navigation status from the declared type's shape.
//!
//! A mapped entity type, or a collection of one, is a navigation property.
//! A recognised scalar is not. Anything else is left for the defaults stage.

use crate::{
    metadata::{ColumnMetadataRecord, EntityContext, PropertyDescriptor, TypeShape},
    resolver::{stage::StageResult, transformed::Transformed},
};

pub fn apply(
    record: &mut ColumnMetadataRecord,
    property: &PropertyDescriptor,
    ctx: &EntityContext,
) -> StageResult<Transformed> {
    let navigation = match ctx.shape_of(&property.declared_type) {
        TypeShape::Entity => true,
        TypeShape::Scalar => false,
        TypeShape::Unknown => return Ok(Transformed::No),
    };

    let fields = record.fields_mut()?;
    Ok(Transformed::from(fields.is_navigation_property.fill(navigation)))
}
