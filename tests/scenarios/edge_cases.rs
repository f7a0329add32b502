//! Test: passthrough, unknown content and failures

use crate::helpers::*;
use monorepo_convert::convert::ConvertError;
use monorepo_convert::core::decode;
use monorepo_convert::provider::UnsupportedProvider;
use monorepo_convert::{Converter, Outcome};

/// Configs without path conditions come back byte-for-byte
#[tokio::test]
async fn test_ungated_config_is_untouched() {
    let yaml = "# build everything\nkind: pipeline\nname:    all\nsteps:\n  - name: test\n    commands: [make test]\ntrigger:\n  branch: [main]\n";
    let provider = MockProvider::new(&["anything"]);
    let converter = Converter::new(provider.clone());

    let conversion = converter.convert(&request(yaml)).await.unwrap();
    assert_eq!(conversion.report.outcome, Outcome::Unchanged);
    assert_eq!(conversion.config, yaml);
    assert_eq!(provider.total_calls(), 0);
}

/// Unrecognized kinds and unknown keys survive a conversion
#[tokio::test]
async fn test_unknown_content_preserved() {
    let yaml = r#"
kind: pipeline
name: app
platform:
  os: linux
  arch: arm64
trigger:
  paths: [app/**]
---
kind: secret
name: docker_password
get:
  path: secret/docker
  name: password
---
kind: signature
hmac: abc123
"#;
    let converter = Converter::new(MockProvider::new(&["app/main.rs"]));

    let conversion = converter.convert(&request(yaml)).await.unwrap();
    let documents = decode(&conversion.config).unwrap();
    let original = decode(yaml).unwrap();

    assert_eq!(documents, original);
    let pipeline = documents[0].as_pipeline().unwrap();
    assert!(pipeline.attrs.contains_key("platform"));
    assert_eq!(documents[1].kind(), Some("secret"));
    assert_eq!(documents[2].kind(), Some("signature"));
}

/// A provider without a changed-file source fails loudly on gated configs
#[tokio::test]
async fn test_unsupported_provider() {
    let converter = Converter::new(UnsupportedProvider::new("github"));

    let gated = "kind: pipeline\ntrigger:\n  paths: [a/**]\n";
    let err = converter.convert(&request(gated)).await.unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedProvider { ref provider } if provider == "github"));

    let ungated = "kind: pipeline\nname: a\n";
    let conversion = converter.convert(&request(ungated)).await.unwrap();
    assert!(conversion.is_unchanged());
}

/// Changed-file errors abort the conversion
#[tokio::test]
async fn test_changed_files_failure_aborts() {
    let provider = MockProvider::new(&[]).failing("fatal: bad revision");
    let converter = Converter::new(provider);

    let err = converter
        .convert(&request("kind: pipeline\ntrigger:\n  paths: [a/**]\n"))
        .await
        .unwrap_err();
    assert!(matches!(err, ConvertError::Provider(_)));
    assert!(err.to_string().contains("bad revision"));
}

/// A malformed document aborts with its position
#[tokio::test]
async fn test_malformed_document_reports_index() {
    let yaml = "kind: pipeline\nname: ok\n---\nkind: pipeline\nsteps: not-a-list\n";
    let provider = MockProvider::new(&[]);
    let converter = Converter::new(provider.clone());

    let err = converter.convert(&request(yaml)).await.unwrap_err();
    match err {
        ConvertError::Parse(parse) => assert_eq!(parse.index, 1),
        other => panic!("Expected parse error, got {:?}", other),
    }
    assert_eq!(provider.total_calls(), 0);
}

/// Converting the converted output again is stable
#[tokio::test]
async fn test_conversion_is_stable() {
    let yaml = "kind: pipeline\nname: a\ntrigger:\n  paths: [a/**]\n";
    let converter = Converter::new(MockProvider::new(&["b/x"]));

    let first = converter.convert(&request(yaml)).await.unwrap();
    let second = converter.convert(&request(&first.config)).await.unwrap();
    assert_eq!(first.config, second.config);
}
