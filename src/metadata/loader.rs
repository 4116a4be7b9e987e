//! Loading model descriptions from YAML or JSON files.

use std::{collections::HashSet, path::Path};

use log::debug;

use super::{descriptor::ModelDescriptor, errors::ModelLoadError};

/// Load a model file. `.json` files are parsed as JSON, everything else as YAML.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<ModelDescriptor, ModelLoadError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let model: ModelDescriptor = if is_json {
        serde_json::from_str(&content).map_err(|source| ModelLoadError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|source| ModelLoadError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };

    check_unique_names(&model)?;

    debug!(
        "Loaded model {} with {} entities",
        path.display(),
        model.entities.len()
    );
    Ok(model)
}

/// Entity names and per-entity property names must be unique.
pub fn check_unique_names(model: &ModelDescriptor) -> Result<(), ModelLoadError> {
    let mut entities = HashSet::new();
    for entity in &model.entities {
        if !entities.insert(entity.name.as_str()) {
            return Err(ModelLoadError::DuplicateEntity(entity.name.clone()));
        }

        let mut properties = HashSet::new();
        for property in &entity.properties {
            if !properties.insert(property.name.as_str()) {
                return Err(ModelLoadError::DuplicateProperty {
                    entity: entity.name.clone(),
                    property: property.name.clone(),
                });
            }
        }
    }
    Ok(())
}
