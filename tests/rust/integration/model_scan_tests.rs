use std::{io::Write, path::PathBuf};

use colmeta::{
    config::ResolverConfig,
    metadata::{load_model, DiagnosticKind, DiagnosticLevel, ModelDescriptor, PropertyIdentity},
    resolver::{MemorySink, ResolutionPipeline, StageId},
    scanner::{EntityScanner, ModelScan},
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.yaml")
}

fn scan_with(config: &ResolverConfig, model: &ModelDescriptor) -> (ModelScan, MemorySink) {
    let sink = MemorySink::new();
    let scan = EntityScanner::from_config(config, &sink)
        .scan_model(model)
        .expect("no contract fault");
    (scan, sink)
}

#[test]
fn test_shop_model_resolves_expected_columns() {
    let model = load_model(fixture()).unwrap();
    let (scan, _) = scan_with(&ResolverConfig::default(), &model);

    let customer = scan.entity("Customer").unwrap();
    let email = customer.record("Email").unwrap();
    assert_eq!(email.column_name(), Some("email_address"));
    assert_eq!(email.column_type(), Some("string"));
    assert_eq!(email.is_required(), Some(true));
    assert_eq!(customer.record("Orders").unwrap().is_navigation_property(), Some(true));

    let location = customer.record("Location").unwrap();
    assert_eq!(location.is_navigation_property(), Some(false));
    assert_eq!(location.is_required(), Some(false));
    assert_eq!(location.diagnostics()[0].kind, DiagnosticKind::DefaultApplied);

    let order = scan.entity("Order").unwrap();
    let reference = order.record("Customer").unwrap();
    assert_eq!(reference.is_navigation_property(), Some(true));
    assert_eq!(reference.foreign_key_association(), Some("CustomerId"));
    assert_eq!(reference.column_type(), None);
    assert_eq!(
        order.record("CustomerId").unwrap().foreign_key_association(),
        Some("Customer")
    );
    let total = order.record("Total").unwrap();
    assert_eq!(total.column_name(), Some("total_amount"));
    assert_eq!(total.column_type(), Some("numeric(18,2)"));

    let line = scan.entity("OrderLine").unwrap();
    assert_eq!(line.record("Order").unwrap().is_navigation_property(), Some(false));
    assert!(line.record("Sku").unwrap().is_unresolved());
    assert!(!line.record("Id").unwrap().is_unresolved());

    let summary = scan.summary();
    assert_eq!(summary.entities, 3);
    assert_eq!(summary.properties, 13);
    assert_eq!(summary.unresolved, 1);
    assert_eq!(summary.deprecations, 1);
    assert_eq!(summary.navigation_properties, 3);
}

#[test]
fn test_logger_sees_every_diagnostic_in_record_order() {
    let model = load_model(fixture()).unwrap();
    let (scan, sink) = scan_with(&ResolverConfig::default(), &model);

    for entity in &scan.entities {
        for record in entity.records() {
            let logged: Vec<(DiagnosticLevel, String)> = sink
                .for_property(record.identity())
                .into_iter()
                .map(|e| (e.level, e.message))
                .collect();
            let recorded: Vec<(DiagnosticLevel, String)> = record
                .diagnostics()
                .iter()
                .map(|d| (d.level, d.message.clone()))
                .collect();
            assert_eq!(logged, recorded, "{}", record.identity());
        }
    }

    let order_line = sink.for_property(&PropertyIdentity::new("OrderLine", "Order"));
    assert_eq!(order_line.len(), 1);
    assert_eq!(order_line[0].level, DiagnosticLevel::Info);
}

#[test]
fn test_parallel_scan_is_deterministic() {
    let model = load_model(fixture()).unwrap();
    let sequential = scan_with(&ResolverConfig::default(), &model).0;

    let config = ResolverConfig {
        parallel: true,
        max_workers: 3,
        ..Default::default()
    };
    for _ in 0..5 {
        let (parallel, _) = scan_with(&config, &model);
        assert_eq!(parallel, sequential);
        assert_eq!(
            parallel.report().fingerprint().unwrap(),
            sequential.report().fingerprint().unwrap()
        );
    }
}

#[test]
fn test_disabling_legacy_stage_changes_only_legacy_properties() {
    let model = load_model(fixture()).unwrap();
    let config = ResolverConfig {
        legacy_foreign_key: false,
        ..Default::default()
    };
    let (scan, _) = scan_with(&config, &model);

    // Still a navigation property through its declared type.
    let reference = scan.entity("Order").unwrap().record("Customer").unwrap();
    assert_eq!(reference.is_navigation_property(), Some(true));
    assert!(reference.diagnostics().is_empty());
    assert_eq!(scan.summary().deprecations, 0);
}

#[test]
fn test_extra_scalar_types_silence_default_info() {
    let model = load_model(fixture()).unwrap();
    let config = ResolverConfig {
        extra_scalar_types: vec!["GeoPoint".to_string()],
        ..Default::default()
    };
    let (scan, _) = scan_with(&config, &model);

    let location = scan.entity("Customer").unwrap().record("Location").unwrap();
    assert_eq!(location.is_navigation_property(), Some(false));
    assert!(location.diagnostics().is_empty());
}

#[test]
fn test_json_model_from_disk() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    write!(
        file,
        r#"{{"entities":[
            {{"name":"Author","properties":[{{"name":"Id","type":"int"}},{{"name":"Books","type":"Book[]"}}]}},
            {{"name":"Book","properties":[{{"name":"Id","type":"int"}},{{"name":"AuthorId","type":"int"}},{{"name":"Author","type":"Author"}}]}}
        ]}}"#
    )?;

    let model = load_model(file.path())?;
    let sink = MemorySink::new();
    let scan = EntityScanner::new(ResolutionPipeline::standard(), &sink).scan_model(&model)?;

    let book = scan.entity("Book").unwrap();
    assert_eq!(book.navigation_properties().count(), 1);
    assert_eq!(
        book.record("AuthorId").unwrap().foreign_key_association(),
        Some("Author")
    );
    assert!(!scan.has_unresolved());
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn test_report_error_entries() {
    let model = load_model(fixture()).unwrap();
    let (scan, _) = scan_with(&ResolverConfig::default(), &model);

    let json: serde_json::Value = serde_json::from_str(&scan.report().to_json().unwrap()).unwrap();
    let order_line = json["entities"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["entity"] == "OrderLine")
        .unwrap();
    assert_eq!(order_line["errors"][0]["property"], "Sku");
    assert_eq!(
        order_line["errors"][0]["stage"],
        serde_json::json!(StageId::NavigationOverride)
    );
    assert!(json["entities"][0].get("errors").is_none());
}
