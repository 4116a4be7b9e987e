//! Reflected property descriptors.
//!
//! These types are the pre-extracted view of an entity model that an external
//! scanner hands to the resolver. The core never inspects host types itself; it
//! only reads what is recorded here. Descriptors are read-only once built.
//!
//! Descriptors deserialize from YAML or JSON:
//!
//! ```yaml
//! entities:
//!   - name: Order
//!     properties:
//!       - name: Customer
//!         type: Customer
//!         annotations:
//!           - kind: foreign_key
//!             value: CustomerId
//!       - name: Lines
//!         type: OrderLine[]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable reference from a record back to the property it describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PropertyIdentity {
    pub declaring_type: String,
    pub property: String,
}

impl PropertyIdentity {
    pub fn new(declaring_type: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            property: property.into(),
        }
    }
}

impl fmt::Display for PropertyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.property)
    }
}

/// Annotation kinds the resolver knows how to read.
///
/// Kinds owned by other layers are kept as `Other` and ignored by every stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnnotationKind {
    /// Current explicit navigation override, payload `bool`.
    Navigation,
    /// Legacy foreign-key marker, payload `null` or the associated property name.
    ForeignKey,
    /// Column mapping, payload a column name or `{ name, type }`.
    Column,
    /// Required marker, payload `null` or `bool`.
    Required,
    /// Primary key marker.
    Key,
    Other(String),
}

impl AnnotationKind {
    pub fn as_str(&self) -> &str {
        match self {
            AnnotationKind::Navigation => "navigation",
            AnnotationKind::ForeignKey => "foreign_key",
            AnnotationKind::Column => "column",
            AnnotationKind::Required => "required",
            AnnotationKind::Key => "key",
            AnnotationKind::Other(kind) => kind,
        }
    }
}

impl From<String> for AnnotationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "navigation" => AnnotationKind::Navigation,
            "foreign_key" => AnnotationKind::ForeignKey,
            "column" => AnnotationKind::Column,
            "required" => AnnotationKind::Required,
            "key" => AnnotationKind::Key,
            _ => AnnotationKind::Other(value),
        }
    }
}

impl From<AnnotationKind> for String {
    fn from(kind: AnnotationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared annotation and its loosely typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Annotation {
    pub fn new(kind: AnnotationKind, value: serde_json::Value) -> Self {
        Self { kind, value }
    }

    /// Annotation without a payload.
    pub fn marker(kind: AnnotationKind) -> Self {
        Self::new(kind, serde_json::Value::Null)
    }
}

/// Declared type of a property. `collection` means "a collection of `name`".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "DeclaredTypeRepr")]
pub struct DeclaredType {
    pub name: String,
    pub collection: bool,
}

impl DeclaredType {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: false,
        }
    }

    pub fn collection_of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collection: true,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.collection {
            write!(f, "{}[]", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Accepts both `Customer[]` shorthand and the `{ name, collection }` form.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeclaredTypeRepr {
    Short(String),
    Full {
        name: String,
        #[serde(default)]
        collection: bool,
    },
}

impl From<DeclaredTypeRepr> for DeclaredType {
    fn from(repr: DeclaredTypeRepr) -> Self {
        match repr {
            DeclaredTypeRepr::Short(text) => match text.strip_suffix("[]") {
                Some(element) => DeclaredType::collection_of(element.trim()),
                None => DeclaredType::scalar(text.trim()),
            },
            DeclaredTypeRepr::Full { name, collection } => DeclaredType { name, collection },
        }
    }
}

/// Read-only description of one property of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: DeclaredType,
    #[serde(default)]
    pub nullable: bool,
    /// Annotations in declaration order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            nullable: false,
            annotations: Vec::new(),
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Annotations of `kind` together with their declaration index.
    pub fn annotations_of<'a>(
        &'a self,
        kind: &'a AnnotationKind,
    ) -> impl Iterator<Item = (usize, &'a Annotation)> + 'a {
        self.annotations
            .iter()
            .enumerate()
            .filter(move |(_, annotation)| &annotation.kind == kind)
    }

    pub fn has_annotation(&self, kind: &AnnotationKind) -> bool {
        self.annotations.iter().any(|a| &a.kind == kind)
    }
}

/// An entity type and its properties in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// The whole mapped model handed over by the scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
}

impl ModelDescriptor {
    pub fn new(entities: Vec<EntityDescriptor>) -> Self {
        Self { entities }
    }

    pub fn is_entity_type(&self, type_name: &str) -> bool {
        self.entities.iter().any(|e| e.name == type_name)
    }
}
