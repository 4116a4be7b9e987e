//! Unit tests for model description parsing
//!
//! Descriptors are the only input the resolver consumes; these tests pin the
//! YAML/JSON shapes without touching the filesystem.

#[cfg(test)]
mod descriptor_parsing_tests {
    use colmeta::metadata::{AnnotationKind, DeclaredType, ModelDescriptor};

    #[test]
    fn test_model_yaml_shapes() {
        let yaml = r#"
entities:
  - name: Order
    properties:
      - name: Id
        type: int
        annotations:
          - kind: key
      - name: Customer
        type: Customer
        nullable: true
        annotations:
          - kind: foreign_key
            value: CustomerId
          - kind: navigation
            value: true
      - name: Lines
        type: { name: OrderLine, collection: true }
  - name: Customer
"#;

        let model: ModelDescriptor = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(model.entities.len(), 2);
        assert!(model.is_entity_type("Customer"));
        assert!(model.entities[1].properties.is_empty());

        let order = &model.entities[0];
        let customer = order.property("Customer").unwrap();
        assert!(customer.nullable);
        assert_eq!(customer.annotations[0].kind, AnnotationKind::ForeignKey);
        assert_eq!(customer.annotations[0].value, serde_json::json!("CustomerId"));
        assert_eq!(customer.annotations[1].kind, AnnotationKind::Navigation);

        let lines = order.property("Lines").unwrap();
        assert_eq!(lines.declared_type, DeclaredType::collection_of("OrderLine"));
    }

    #[test]
    fn test_model_json_round_trips_annotation_kinds() {
        let json = r#"{"entities":[{"name":"Tag","properties":[
            {"name":"Label","type":"string","annotations":[{"kind":"column","value":{"name":"label","type":"varchar(64)"}},{"kind":"index"}]}
        ]}]}"#;

        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        let label = &model.entities[0].properties[0];
        assert_eq!(label.annotations[1].kind, AnnotationKind::Other("index".into()));

        let back = serde_json::to_value(&model).unwrap();
        assert_eq!(
            back["entities"][0]["properties"][0]["annotations"][1]["kind"],
            serde_json::json!("index")
        );
    }
}
