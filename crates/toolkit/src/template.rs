//! CloudFormation template pre-processing.
//!
//! Raw templates are kept readable and DRY: they may contain comments,
//! `{{ VAR_NAME }}` placeholders filled from the centralised config, and they
//! leave out the tags every resource shares. Processing a stack means
//!
//! 1. reading each template (the master and every nested stack it references),
//! 2. substituting placeholders in the raw text,
//! 3. parsing the result with comments stripped,
//! 4. adding the common tags to every taggable resource,
//! 5. writing the final JSON to the output directory under the same file name.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::comments::parse_jsonc;
use crate::errors::{Result, ToolkitError};
use crate::identifiers::ResourceType;
use crate::store::{normalize_path, read_jsonc, FileStore};
use crate::types::{render_scalar, to_pretty_json, Tag};

/// Resource type of a nested stack.
pub const NESTED_STACK_TYPE: &str = "AWS::CloudFormation::Stack";

/// Resource types that receive common tags unless the caller chooses others.
pub const DEFAULT_TAGGABLE_RESOURCE_TYPES: &[&str] = &[
    "AWS::EC2::VPC",
    "AWS::EC2::Subnet",
    "AWS::EC2::InternetGateway",
    "AWS::EC2::NatGateway",
    "AWS::EC2::RouteTable",
    "AWS::IAM::Role",
    "AWS::EC2::SecurityGroup",
    "AWS::ECS::Cluster",
    "AWS::ElasticLoadBalancingV2::LoadBalancer",
    "AWS::ElasticLoadBalancingV2::TargetGroup",
    "AWS::EC2::Instance",
    NESTED_STACK_TYPE,
];

/// Returns [`DEFAULT_TAGGABLE_RESOURCE_TYPES`] as typed identifiers.
pub fn default_taggable_resource_types() -> Vec<ResourceType> {
    DEFAULT_TAGGABLE_RESOURCE_TYPES
        .iter()
        .filter_map(|t| ResourceType::new(*t))
        .collect()
}

// ---------------------------------------------------------------------------
// Variable injection
// ---------------------------------------------------------------------------

fn placeholder_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // `{{ VAR_NAME }}`; the name is matched lazily so adjacent placeholders stay separate.
    PATTERN.get_or_init(|| Regex::new(r"\{\{([^)]+?)\}\}").expect("placeholder pattern is valid"))
}

/// Returns the trimmed names of every `{{ NAME }}` placeholder in `text`, in
/// order of appearance. Repeated names are repeated.
pub fn placeholders(text: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(text)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Replaces every `{{ NAME }}` in `text` with the rendered value of `NAME`.
///
/// Strings are inserted raw; other values as compact JSON. Fails on the first
/// name missing from `data`, and fails if any placeholder remains after
/// substitution (for example one introduced by a substituted value).
pub fn inject_variables(text: &str, data: &Map<String, Value>) -> Result<String> {
    let mut injected = text.to_string();

    for caps in placeholder_regex().captures_iter(text) {
        let placeholder = &caps[0];
        let name = caps[1].trim();
        let value = data
            .get(name)
            .ok_or_else(|| ToolkitError::UndefinedVariable {
                name: name.to_string(),
            })?;
        injected = injected.replace(placeholder, &render_scalar(value));
    }

    let remaining: Vec<String> = placeholder_regex()
        .find_iter(&injected)
        .map(|m| m.as_str().to_string())
        .collect();
    if !remaining.is_empty() {
        return Err(ToolkitError::UnresolvedVariables { names: remaining });
    }

    Ok(injected)
}

// ---------------------------------------------------------------------------
// Common tags
// ---------------------------------------------------------------------------

/// Adds `tags` to every resource in `template` whose `Type` is listed in
/// `resource_types`.
///
/// Tags already present on a resource win: a common tag is only appended when
/// no existing tag has the same `Key`. A missing `Properties` object is
/// created. Returns the number of resources visited.
pub fn apply_common_tags(
    template: &mut Value,
    tags: &[Tag],
    resource_types: &[ResourceType],
) -> Result<usize> {
    let selected: HashSet<&str> = resource_types.iter().map(ResourceType::as_str).collect();

    let Some(resources) = template.get_mut("Resources").and_then(Value::as_object_mut) else {
        return Ok(0);
    };

    let mut tagged = 0;
    for (name, resource) in resources.iter_mut() {
        let resource_type = resource
            .get("Type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ToolkitError::malformed("<template>", format!("resource '{name}' has no Type"))
            })?;
        if !selected.contains(resource_type) {
            continue;
        }

        let Some(resource) = resource.as_object_mut() else {
            continue;
        };
        let properties = resource
            .entry("Properties")
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| {
                ToolkitError::malformed(
                    "<template>",
                    format!("Properties of resource '{name}' is not an object"),
                )
            })?;

        match properties.get_mut("Tags") {
            None => {
                let list = tags.iter().map(Tag::to_value).collect();
                properties.insert("Tags".to_string(), Value::Array(list));
            }
            Some(Value::Array(existing)) => {
                let present: HashSet<String> = existing
                    .iter()
                    .filter_map(|t| t.get("Key").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect();
                existing.extend(
                    tags.iter()
                        .filter(|t| !present.contains(&t.key))
                        .map(Tag::to_value),
                );
            }
            Some(_) => {
                return Err(ToolkitError::malformed(
                    "<template>",
                    format!("Tags of resource '{name}' is not a list"),
                ))
            }
        }
        tagged += 1;
    }

    Ok(tagged)
}

// ---------------------------------------------------------------------------
// Stack rendering
// ---------------------------------------------------------------------------

/// Lists the templates making up a stack: every nested stack referenced by a
/// `TemplateURL` relative to the master, followed by the master itself.
///
/// The master is parsed as written, so placeholders in it must sit inside
/// JSON strings. [`render_stack_templates`] injects variables first and has no
/// such restriction.
pub fn stack_template_paths(store: &dyn FileStore, master: &Path) -> Result<Vec<PathBuf>> {
    let master = store.resolve(master);
    let document = read_jsonc(store, &master)?;
    let mut paths = nested_stack_paths(&document, &master)?;
    paths.push(master);
    Ok(paths)
}

fn nested_stack_paths(document: &Value, master: &Path) -> Result<Vec<PathBuf>> {
    let label = master.display().to_string();
    let master_dir = master.parent().unwrap_or_else(|| Path::new("/"));

    let mut paths = Vec::new();
    if let Some(resources) = document.get("Resources").and_then(Value::as_object) {
        for (name, resource) in resources {
            if resource.get("Type").and_then(Value::as_str) != Some(NESTED_STACK_TYPE) {
                continue;
            }
            let url = resource
                .pointer("/Properties/TemplateURL")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ToolkitError::malformed(
                        label.clone(),
                        format!("nested stack '{name}' has no TemplateURL"),
                    )
                })?;
            paths.push(normalize_path(&master_dir.join(url)));
        }
    }
    Ok(paths)
}

/// Injects `variables` into one template file and parses the result.
fn load_injected(
    store: &dyn FileStore,
    source: &Path,
    variables: &Map<String, Value>,
) -> Result<Value> {
    let raw = store.read_text(source)?;
    let injected = inject_variables(&raw, variables)?;
    parse_jsonc(&injected, &source.display().to_string())
}

/// Processes a master template and its nested stacks into `out_dir`.
///
/// Variables are injected before any template is parsed, so a placeholder may
/// stand in for a number or boolean (`"Port": {{ PORT }}`), in the master as
/// well as in nested stacks.
///
/// Returns the paths written, nested stacks first.
pub fn render_stack_templates(
    store: &dyn FileStore,
    master: &Path,
    out_dir: &Path,
    variables: &Map<String, Value>,
    tags: &[Tag],
    resource_types: &[ResourceType],
) -> Result<Vec<PathBuf>> {
    let out_dir = store.resolve(out_dir);
    let master = store.resolve(master);
    let master_document = load_injected(store, &master, variables)?;

    let mut sources = nested_stack_paths(&master_document, &master)?;
    sources.push(master.clone());

    let mut master_document = Some(master_document);
    let mut written = Vec::new();
    for source in sources {
        let label = source.display().to_string();
        let file_name = source
            .file_name()
            .ok_or_else(|| ToolkitError::malformed(label.clone(), "path has no file name"))?;

        let mut document = match master_document.take_if(|_| source == master) {
            Some(document) => document,
            None => load_injected(store, &source, variables)?,
        };
        let tagged = apply_common_tags(&mut document, tags, resource_types).map_err(|e| match e {
            ToolkitError::MalformedTemplate { reason, .. } => ToolkitError::MalformedTemplate {
                source_name: label.clone(),
                reason,
            },
            other => other,
        })?;

        let destination = out_dir.join(file_name);
        store.write_text(&destination, &to_pretty_json(&document)?)?;
        tracing::info!(
            source = %label,
            destination = %destination.display(),
            tagged,
            "template rendered"
        );
        written.push(destination);
    }

    Ok(written)
}
