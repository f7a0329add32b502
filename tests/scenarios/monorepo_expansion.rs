//! Test: monorepo project expansion

use crate::helpers::*;
use monorepo_convert::convert::ConvertError;
use monorepo_convert::core::decode;
use monorepo_convert::provider::ProviderError;
use monorepo_convert::Converter;

const ROOT: &str = r#"
kind: pipeline
name: root
trigger:
  paths:
    include: [shared/**]
---
kind: monorepo
projects:
  - service-a
  - service-b
"#;

fn service(name: &str) -> String {
    format!(
        "kind: pipeline\nname: {name}\ntrigger:\n  paths:\n    include: [{name}/**]\n",
        name = name
    )
}

fn provider(changed: &[&str]) -> MockProvider {
    MockProvider::new(changed)
        .with_file("service-a", &service("service-a"))
        .with_file("service-b", &service("service-b"))
}

/// Fetched project pipelines are appended and filtered with the same list
#[tokio::test]
async fn test_projects_are_expanded_and_filtered() {
    let provider = provider(&["service-b/handler.go"]);
    let converter = Converter::new(provider.clone());

    let conversion = converter.convert(&request(ROOT)).await.unwrap();
    let documents = decode(&conversion.config).unwrap();

    let kinds: Vec<_> = documents.iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        vec![Some("pipeline"), Some("monorepo"), Some("pipeline"), Some("pipeline")]
    );

    assert_eq!(trigger_event(&documents, "root"), Some(suppression_marker()));
    assert_eq!(trigger_event(&documents, "service-a"), Some(suppression_marker()));
    assert_eq!(trigger_event(&documents, "service-b"), None);

    assert_eq!(conversion.report.projects, vec!["service-a", "service-b"]);
    assert_eq!(
        provider.fetched(),
        vec![
            ("service-a".to_string(), "9a8b7c6d".to_string()),
            ("service-b".to_string(), "9a8b7c6d".to_string()),
        ]
    );
}

/// Any failed fetch aborts the whole conversion
#[tokio::test]
async fn test_missing_project_aborts() {
    let provider = MockProvider::new(&["service-a/main.go"]).with_file("service-a", &service("service-a"));
    let converter = Converter::new(provider);

    let err = converter.convert(&request(ROOT)).await.unwrap_err();
    assert!(matches!(
        err,
        ConvertError::ProjectFetch { ref path, source: ProviderError::NotFound { .. } }
            if path == "service-b"
    ));
}

/// A monorepo document inside a fetched project is carried but not expanded
#[tokio::test]
async fn test_nested_monorepo_not_expanded() {
    let root = "kind: pipeline\nname: root\ntrigger:\n  paths: [x/**]\n---\nkind: monorepo\nprojects: [service-a]\n";
    let provider = MockProvider::new(&["x/y"])
        .with_file("service-a", "kind: monorepo\nprojects: [deeper]\n");
    let converter = Converter::new(provider.clone());

    let conversion = converter.convert(&request(root)).await.unwrap();
    let documents = decode(&conversion.config).unwrap();

    assert_eq!(documents.len(), 3);
    assert_eq!(provider.fetched().len(), 1);
}

/// Without path conditions in the root config nothing is fetched
#[tokio::test]
async fn test_ungated_root_skips_expansion() {
    let root = "kind: monorepo\nprojects: [service-a]\n";
    let provider = provider(&["service-a/main.go"]);
    let converter = Converter::new(provider.clone());

    let conversion = converter.convert(&request(root)).await.unwrap();
    assert!(conversion.is_unchanged());
    assert_eq!(conversion.config, root);
    assert_eq!(provider.total_calls(), 0);
}
