//! Test: path gating of pipelines and steps

use crate::helpers::*;
use monorepo_convert::core::decode;
use monorepo_convert::{Converter, Outcome};

const SERVICE_A: &str = r#"
kind: pipeline
type: docker
name: service-a
steps:
  - name: build
    image: golang:1.22
    commands:
      - go build ./...
trigger:
  paths:
    include:
      - service-a/**
"#;

/// A change inside the include pattern keeps the pipeline
#[tokio::test]
async fn test_matching_change_keeps_pipeline() {
    let provider = MockProvider::new(&["service-a/main.go"]);
    let converter = Converter::new(provider.clone());

    let conversion = converter.convert(&request(SERVICE_A)).await.unwrap();
    assert_eq!(conversion.report.outcome, Outcome::Converted);

    let documents = decode(&conversion.config).unwrap();
    assert_eq!(trigger_event(&documents, "service-a"), None);
    assert_eq!(provider.changed_files_calls(), 1);
}

/// An unrelated change injects the suppression marker
#[tokio::test]
async fn test_unrelated_change_skips_pipeline() {
    let converter = Converter::new(MockProvider::new(&["service-b/main.go"]));

    let conversion = converter.convert(&request(SERVICE_A)).await.unwrap();
    let documents = decode(&conversion.config).unwrap();

    assert_eq!(trigger_event(&documents, "service-a"), Some(suppression_marker()));
    assert_eq!(conversion.report.filter.skipped_pipelines(), vec![Some("service-a")]);

    // everything else survives
    let pipeline = documents[0].as_pipeline().unwrap();
    assert_eq!(pipeline.pipeline_type.as_deref(), Some("docker"));
    assert_eq!(pipeline.steps.len(), 1);
    assert!(pipeline.steps[0].attrs.contains_key("commands"));
    assert_eq!(pipeline.trigger.paths.include, vec!["service-a/**"]);
}

/// An empty change list never suppresses anything
#[tokio::test]
async fn test_empty_change_list_keeps_pipeline() {
    let converter = Converter::new(MockProvider::new(&[]));

    let conversion = converter.convert(&request(SERVICE_A)).await.unwrap();
    let documents = decode(&conversion.config).unwrap();

    assert_eq!(trigger_event(&documents, "service-a"), None);
    assert_eq!(conversion.report.filter.skipped_count(), 0);
}

/// Steps are gated on their own inside a kept pipeline
#[tokio::test]
async fn test_step_gating() {
    let yaml = r#"
kind: pipeline
name: mono
steps:
  - name: web
    when:
      branch: [main]
      paths: [web/**]
  - name: api
    when:
      paths:
        include: [api/**]
        exclude: ["api/docs/**"]
  - name: notify
"#;
    let converter = Converter::new(MockProvider::new(&["api/docs/index.md"]));

    let conversion = converter.convert(&request(yaml)).await.unwrap();
    let documents = decode(&conversion.config).unwrap();
    let pipeline = documents[0].as_pipeline().unwrap();

    assert_eq!(pipeline.steps[0].when.attrs.get("event"), Some(&suppression_marker()));
    assert!(pipeline.steps[0].when.attrs.contains_key("branch"));
    assert_eq!(pipeline.steps[1].when.attrs.get("event"), Some(&suppression_marker()));
    assert!(pipeline.steps[2].when.is_empty());
    assert_eq!(
        conversion.report.filter.skipped_steps(),
        vec![(Some("mono"), "web"), (Some("mono"), "api")]
    );
}

/// The bare scalar condition behaves like the include list form
#[tokio::test]
async fn test_scalar_condition_equivalent_to_include() {
    let scalar = "kind: pipeline\nname: a\ntrigger:\n  paths: service-a/**\n";
    let mapping = "kind: pipeline\nname: a\ntrigger:\n  paths:\n    include: [service-a/**]\n";

    let scalar_docs = decode(scalar).unwrap();
    let mapping_docs = decode(mapping).unwrap();
    assert_eq!(scalar_docs, mapping_docs);

    for changed in [["service-a/x.go"], ["service-b/x.go"]] {
        let from_scalar = Converter::new(MockProvider::new(&changed))
            .convert(&request(scalar))
            .await
            .unwrap();
        let from_mapping = Converter::new(MockProvider::new(&changed))
            .convert(&request(mapping))
            .await
            .unwrap();
        assert_eq!(from_scalar.config, from_mapping.config);
    }
}

/// Conditions shared through YAML merge keys still gate their steps
#[tokio::test]
async fn test_merge_key_conditions_gate_steps() {
    let yaml = r#"
kind: pipeline
name: shared
x-web: &web
  when:
    paths: [web/**]
steps:
  - <<: *web
    name: web-build
  - name: always
"#;
    let provider = MockProvider::new(&["api/server.go"]);
    let converter = Converter::new(provider.clone());

    let conversion = converter.convert(&request(yaml)).await.unwrap();
    assert_eq!(conversion.report.outcome, Outcome::Converted);
    assert_eq!(provider.changed_files_calls(), 1);

    let documents = decode(&conversion.config).unwrap();
    let pipeline = documents[0].as_pipeline().unwrap();
    assert_eq!(pipeline.steps[0].when.attrs.get("event"), Some(&suppression_marker()));
    assert_eq!(
        conversion.report.filter.skipped_steps(),
        vec![(Some("shared"), "web-build")]
    );
}
