//! Behavioural guarantees of the resolution pipeline: idempotence, locking,
//! legacy/override precedence, defaults, failure isolation and diagnostic order.

#[cfg(test)]
mod resolution_properties_tests {
    use colmeta::{
        metadata::{
            Annotation, AnnotationKind, ColumnMetadataRecord, DeclaredType, DiagnosticKind,
            DiagnosticLevel, EntityContext, EntityDescriptor, ModelDescriptor, PropertyDescriptor,
            ScalarVocabulary,
        },
        resolver::{MemorySink, ResolutionPipeline, StageId},
        scanner::EntityScanner,
    };
    use serde_json::json;

    fn shop() -> (EntityDescriptor, ModelDescriptor) {
        let order = EntityDescriptor::new("Order")
            .with_property(PropertyDescriptor::new("Id", DeclaredType::scalar("int")))
            .with_property(PropertyDescriptor::new(
                "CustomerId",
                DeclaredType::scalar("int"),
            ))
            .with_property(PropertyDescriptor::new(
                "Customer",
                DeclaredType::scalar("Customer"),
            ));
        let model = ModelDescriptor::new(vec![order.clone(), EntityDescriptor::new("Customer")]);
        (order, model)
    }

    fn context() -> EntityContext {
        let (order, model) = shop();
        EntityContext::new(&order, &model, ScalarVocabulary::default())
    }

    fn resolve(
        pipeline: &ResolutionPipeline,
        property: &PropertyDescriptor,
    ) -> ColumnMetadataRecord {
        pipeline
            .run(property, &context(), &MemorySink::new())
            .expect("no contract fault")
            .expect("property resolves")
    }

    fn annotated(name: &str, ty: DeclaredType, annotations: Vec<Annotation>) -> PropertyDescriptor {
        annotations
            .into_iter()
            .fold(PropertyDescriptor::new(name, ty), |p, a| p.annotated(a))
    }

    #[test]
    fn test_running_twice_gives_identical_records() {
        let pipeline = ResolutionPipeline::standard();
        let property = annotated(
            "Customer",
            DeclaredType::scalar("Customer"),
            vec![
                Annotation::new(AnnotationKind::ForeignKey, json!("CustomerId")),
                Annotation::new(AnnotationKind::Navigation, json!(true)),
                Annotation::new(AnnotationKind::Navigation, json!(false)),
                Annotation::new(AnnotationKind::Column, json!({"name": "customer_ref"})),
            ],
        );

        let first = resolve(&pipeline, &property);
        let second = resolve(&pipeline, &property);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_explicit_override_is_locked_against_later_tiers() {
        let full = ResolutionPipeline::standard();
        let explicit_only = ResolutionPipeline::standard().filtered(|stage| stage.tier == 0);

        for value in [true, false] {
            for ty in [DeclaredType::scalar("Customer"), DeclaredType::scalar("int")] {
                let property = annotated(
                    "Customer",
                    ty,
                    vec![
                        Annotation::marker(AnnotationKind::ForeignKey),
                        Annotation::new(AnnotationKind::Navigation, json!(value)),
                    ],
                );

                let with_all = resolve(&full, &property);
                let tier_zero = resolve(&explicit_only, &property);
                assert_eq!(with_all.is_navigation_property(), Some(value));
                assert_eq!(
                    with_all.fields().is_navigation_property,
                    tier_zero.fields().is_navigation_property
                );
            }
        }
    }

    #[test]
    fn test_legacy_annotation_alone_marks_navigation_with_one_deprecation() {
        let property = annotated(
            "Customer",
            DeclaredType::scalar("Customer"),
            vec![Annotation::marker(AnnotationKind::ForeignKey)],
        );
        let sink = MemorySink::new();

        let record = ResolutionPipeline::standard()
            .run(&property, &context(), &sink)
            .unwrap()
            .unwrap();

        assert_eq!(record.is_navigation_property(), Some(true));
        let deprecations: Vec<_> = record
            .diagnostics()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Deprecation)
            .collect();
        assert_eq!(deprecations.len(), 1);
        assert_eq!(deprecations[0].stage, StageId::LegacyForeignKey);
        assert!(deprecations[0].message.contains("foreign_key"));
        assert!(deprecations[0].message.contains("navigation"));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_legacy_annotation_beats_scalar_default() {
        let property = annotated(
            "Reference",
            DeclaredType::scalar("Address"),
            vec![Annotation::marker(AnnotationKind::ForeignKey)],
        );
        let record = resolve(&ResolutionPipeline::standard(), &property);
        assert_eq!(record.is_navigation_property(), Some(true));
    }

    #[test]
    fn test_override_beats_legacy_with_info_only() {
        let property = annotated(
            "Customer",
            DeclaredType::scalar("Customer"),
            vec![
                Annotation::new(AnnotationKind::ForeignKey, json!("CustomerId")),
                Annotation::new(AnnotationKind::Navigation, json!(false)),
            ],
        );

        let record = resolve(&ResolutionPipeline::standard(), &property);

        assert_eq!(record.is_navigation_property(), Some(false));
        assert!(record
            .diagnostics()
            .iter()
            .all(|d| d.kind != DiagnosticKind::Deprecation));
        let ignored: Vec<_> = record
            .diagnostics()
            .iter()
            .filter(|d| d.kind == DiagnosticKind::IgnoredLegacy)
            .collect();
        assert_eq!(ignored.len(), 1);
        assert_eq!(ignored[0].level, DiagnosticLevel::Info);
        // The ignored annotation contributes nothing, not even its association.
        assert_ne!(record.foreign_key_association(), Some("CustomerId"));
    }

    #[test]
    fn test_plain_scalar_defaults() {
        for nullable in [true, false] {
            let property =
                PropertyDescriptor::new("Note", DeclaredType::scalar("string")).nullable(nullable);
            let record = resolve(&ResolutionPipeline::standard(), &property);

            assert_eq!(record.is_navigation_property(), Some(false));
            assert_eq!(record.is_required(), Some(!nullable));
            assert_eq!(record.column_name(), Some("Note"));
            assert_eq!(record.foreign_key_association(), None);
            assert!(record.diagnostics().is_empty());
            assert!(record.is_frozen());
        }
    }

    #[test]
    fn test_malformed_payload_only_affects_its_property() {
        let order = EntityDescriptor::new("Order")
            .with_property(annotated(
                "Customer",
                DeclaredType::scalar("Customer"),
                vec![Annotation::new(AnnotationKind::Navigation, json!({"on": true}))],
            ))
            .with_property(annotated(
                "Seller",
                DeclaredType::scalar("Customer"),
                vec![Annotation::new(AnnotationKind::Navigation, json!(true))],
            ));
        let model = ModelDescriptor::new(vec![order.clone(), EntityDescriptor::new("Customer")]);
        let sink = MemorySink::new();

        let scan = EntityScanner::new(ResolutionPipeline::standard(), &sink)
            .scan_entity(&order, &model)
            .unwrap();

        let customer = scan.record("Customer").unwrap();
        assert!(customer.is_unresolved());
        let seller = scan.record("Seller").unwrap();
        assert!(!seller.is_unresolved());
        assert_eq!(seller.is_navigation_property(), Some(true));
        assert_eq!(scan.unresolved().count(), 1);
        assert_eq!(
            scan.unresolved().next().unwrap().error.stage,
            StageId::NavigationOverride
        );
    }

    #[test]
    fn test_diagnostics_follow_tier_order() {
        let property = annotated(
            "ShipTo",
            DeclaredType::scalar("Address"),
            vec![
                Annotation::new(AnnotationKind::Column, json!("ship_to")),
                Annotation::new(AnnotationKind::Column, json!("shipping_address")),
                Annotation::new(AnnotationKind::Required, json!(true)),
                Annotation::new(AnnotationKind::Required, json!(false)),
            ],
        );
        let sink = MemorySink::new();

        let record = ResolutionPipeline::standard()
            .run(&property, &context(), &sink)
            .unwrap()
            .unwrap();

        let tiers: Vec<u8> = record.diagnostics().iter().map(|d| d.tier).collect();
        assert_eq!(tiers, vec![0, 0, 3]);
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));

        let logged: Vec<String> = sink.entries().into_iter().map(|e| e.message).collect();
        let recorded: Vec<String> = record
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect();
        assert_eq!(logged, recorded);
    }

    #[test]
    fn test_deprecation_follows_explicit_diagnostics() {
        let property = annotated(
            "Customer",
            DeclaredType::scalar("Customer"),
            vec![
                Annotation::new(AnnotationKind::Column, json!("a")),
                Annotation::new(AnnotationKind::Column, json!("b")),
                Annotation::marker(AnnotationKind::ForeignKey),
            ],
        );

        let record = resolve(&ResolutionPipeline::standard(), &property);
        let kinds: Vec<DiagnosticKind> = record.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::AmbiguousOverride, DiagnosticKind::Deprecation]
        );
    }

    #[test]
    fn test_legacy_stage_can_be_switched_off() {
        let pipeline = ResolutionPipeline::standard()
            .filtered(|stage| stage.id != StageId::LegacyForeignKey);
        let property = annotated(
            "Reference",
            DeclaredType::scalar("int"),
            vec![Annotation::marker(AnnotationKind::ForeignKey)],
        );

        let record = resolve(&pipeline, &property);
        assert_eq!(record.is_navigation_property(), Some(false));
        assert!(record.diagnostics().is_empty());
    }
}
