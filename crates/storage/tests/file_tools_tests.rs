// End-to-end tests for the toolkit operations over real files.
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use storage::LocalFileStore;
use toolkit::*;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

// ═══════════════════════════════════════════════════════════════════════
// JSON value lookup
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_get_json_value() {
    let store = LocalFileStore::with_base(fixtures());
    let file = Path::new("complex-data.json");

    for (path, expected) in [
        ("name", "alice"),
        ("$.name", "alice"),
        ("profile.ssn", "123-45-6789"),
        ("$.profile.ssn", "123-45-6789"),
        ("profile.first name", "obama"),
        ("$.profile.first name", "obama"),
        ("profile.phone-number", "999-888-7777"),
        ("$.profile.phone-number", "999-888-7777"),
        ("profile.website", "https://example.com/#about"),
        ("regions.1", "eu-west-1"),
    ] {
        assert_eq!(read_json_value(&store, file, path).unwrap(), json!(expected), "{path}");
    }
}

#[test]
fn test_get_json_value_missing_key() {
    let store = LocalFileStore::with_base(fixtures());
    let err = read_json_value(&store, Path::new("complex-data.json"), "$.profile.age").unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "'$.profile.age' not found in {}",
            fixtures().join("complex-data.json").display()
        )
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Parameter overrides
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_get_parameters_data() {
    let store = LocalFileStore::with_base(fixtures());
    let parameters = load_parameter_overrides(
        &store,
        Path::new("master-tier.json"),
        Path::new("master-tier-config.json"),
    )
    .unwrap();

    assert_eq!(
        Value::Object(parameters.clone()),
        json!({"ProjectName": "config_lib", "Stage": "dev"})
    );
    assert_eq!(format_overrides(&parameters), "ProjectName=config_lib Stage=dev");
}

#[test]
fn test_parameters_missing_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"ProjectName": "x"}"#).unwrap();
    let store = LocalFileStore::with_base(dir.path());

    let err = load_parameter_overrides(
        &store,
        &fixtures().join("master-tier.json"),
        Path::new("config.json"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ToolkitError::MissingParameter { ref parameter, .. } if parameter == "Stage"
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Stack rendering
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_render_stack_templates_to_disk() {
    let out = tempfile::tempdir().unwrap();
    let store = LocalFileStore::with_base(fixtures());

    let variables = match read_jsonc(&store, Path::new("master-tier-config.json")).unwrap() {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    };
    let tags = [Tag::new("Name", "config-lib-dev"), Tag::new("Stage", "dev")];

    let written = render_stack_templates(
        &store,
        Path::new("master-tier.json"),
        out.path(),
        &variables,
        &tags,
        &default_taggable_resource_types(),
    )
    .unwrap();
    assert_eq!(
        written,
        [out.path().join("vpc-tier.json"), out.path().join("master-tier.json")]
    );

    let text = std::fs::read_to_string(out.path().join("vpc-tier.json")).unwrap();
    assert!(text.starts_with("{\n    \"AWSTemplateFormatVersion\""));
    let vpc: Value = serde_json::from_str(&text).unwrap();

    // The explicit Name tag wins over the common one.
    assert_eq!(
        vpc["Resources"]["VPC"]["Properties"]["Tags"],
        json!([
            {"Key": "Name", "Value": "config-lib-dev-vpc"},
            {"Key": "Stage", "Value": "dev"}
        ])
    );
    assert_eq!(
        vpc["Resources"]["PublicSubnet"]["Properties"]["Tags"],
        json!([
            {"Key": "Name", "Value": "config-lib-dev"},
            {"Key": "Stage", "Value": "dev"}
        ])
    );
    assert_eq!(
        vpc["Resources"]["Bucket"]["Properties"],
        json!({"BucketName": "config_lib-dev-artifacts"})
    );

    // Key order of the source template is preserved.
    let keys: Vec<&String> = vpc["Resources"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["VPC", "PublicSubnet", "Bucket"]);
}

#[test]
fn test_render_fails_on_undefined_variable() {
    let out = tempfile::tempdir().unwrap();
    let store = LocalFileStore::with_base(fixtures());

    let err = render_stack_templates(
        &store,
        Path::new("master-tier.json"),
        out.path(),
        &Map::new(),
        &[],
        &[],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ToolkitError::UndefinedVariable {
            name: "EnvironmentName".into()
        }
    );
    assert!(!out.path().join("vpc-tier.json").exists());
}
