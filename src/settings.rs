//! Settings document patching
//!
//! This module derives each instance's `appsettings.json` from the shared
//! base template. The template is re-read and re-parsed for every instance so
//! no instance can observe another instance's patches.
//!
//! ## Patch order
//!
//! 1. **Structural overrides**: a fixed set of branches
//!    (`ExternalServices`, `App`, `ConnectionStrings`,
//!    `ExternalPyxoomServices`, `RabbitMQ`, `Serilog`) is updated with the
//!    instance's identity and routing fields. A branch that is absent from
//!    the template is silently skipped, never created.
//! 2. **Free-form overrides**: colon-delimited key paths from
//!    `customSettings`, applied last so they win over structural overrides.
//!    Missing intermediate objects are created; the leaf is overwritten with
//!    a plain string regardless of what was there before.
//!
//! The document is navigated through two explicit operations:
//! [`get_path_mut`] (get-if-present) and [`ensure_object_path`]
//! (get-or-create). `null` intermediates are promoted to objects; any other
//! non-object intermediate is a patch error.

use serde_json::{Map, Value};
use std::path::Path;

use crate::config::InstanceSpec;
use crate::error::{Error, Result};

/// Declared sink type whose path gets rewritten to the instance log dir.
const FILE_SINK_NAME: &str = "File";

/// Navigate to a nested value if the whole path exists.
///
/// Returns `None` as soon as a segment is missing or the current node is not
/// an object. Never modifies the document.
pub fn get_path_mut<'a>(root: &'a mut Value, segments: &[&str]) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(*segment)?;
    }
    Some(current)
}

/// Navigate to a nested object, creating empty objects along the way.
///
/// A `null` node is promoted to an empty object; any other non-object node on
/// the path is an error. Returns the object at the end of the path.
pub fn ensure_object_path<'a>(
    root: &'a mut Value,
    segments: &[&str],
) -> Result<&'a mut Map<String, Value>> {
    let mut current = root;
    for segment in segments {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let map = current.as_object_mut().ok_or_else(|| Error::Patch {
            message: format!("expected object while navigating to '{}'", segment),
        })?;
        current = map
            .entry(segment.to_string())
            .or_insert(Value::Object(Map::new()));
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    current.as_object_mut().ok_or_else(|| Error::Patch {
        message: "expected object at end of path".to_string(),
    })
}

/// Apply all overrides for one instance to a parsed settings document.
pub fn patch(document: &mut Value, instance: &InstanceSpec) -> Result<()> {
    apply_structural_overrides(document, instance);
    rewrite_log_sinks(document, instance);
    apply_custom_settings(document, instance)?;
    Ok(())
}

/// Read the base template, patch it for `instance`, and serialize it as
/// indented JSON. Any failure is wrapped with the instance name.
pub fn render(template_path: &Path, instance: &InstanceSpec) -> Result<String> {
    render_inner(template_path, instance).map_err(|e| Error::Settings {
        instance: instance.instance_name.clone(),
        message: e.to_string(),
    })
}

fn render_inner(template_path: &Path, instance: &InstanceSpec) -> Result<String> {
    let template = std::fs::read_to_string(template_path)?;
    let mut document: Value = serde_json::from_str(&template)?;
    patch(&mut document, instance)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Update the fixed settings branches, skipping any branch the template does
/// not already define.
fn apply_structural_overrides(document: &mut Value, instance: &InstanceSpec) {
    if let Some(Value::Object(services)) = document.get_mut("ExternalServices") {
        services.insert(
            "ClientId".to_string(),
            Value::String(instance.client_id.clone()),
        );
        services.insert(
            "PyxoomInteractiveUrl".to_string(),
            Value::String(instance.pyxoom_interactive_url.clone()),
        );
        services.insert(
            "PyxoomInteractivePublicPrivacy".to_string(),
            Value::String(instance.pyxoom_interactive_public_privacy.clone()),
        );
    }

    if let Some(Value::Object(app)) = document.get_mut("App") {
        app.insert(
            "ClientId".to_string(),
            Value::String(instance.client_id.clone()),
        );
        app.insert("EmpresaId".to_string(), Value::from(instance.empresa_id));
    }

    if let Some(Value::Object(connections)) = document.get_mut("ConnectionStrings") {
        connections.insert(
            "Pyxoom42".to_string(),
            Value::String(instance.pyxoom_connection_string.clone()),
        );
    }

    if let Some(Value::Object(external)) = document.get_mut("ExternalPyxoomServices") {
        external.insert(
            "ApiUrl".to_string(),
            Value::String(instance.external_pyxoom_services_api_url.clone()),
        );
    }

    if let Some(Value::Object(rabbit)) = document.get_mut("RabbitMQ") {
        rabbit.insert(
            "Channel".to_string(),
            Value::String(instance.rabbit_mq_channel.clone()),
        );
    }
}

/// Point every configured file sink at the instance's log directory and tag
/// the logging application name with the instance's display name.
///
/// Walks `Serilog.WriteTo[*].Args.configure[*]`; entries whose `Name` is
/// `File` and which carry an `Args.path` get their path rewritten to
/// `<logPath>/<original file name>` with forward slashes. The original
/// directory component is discarded.
fn rewrite_log_sinks(document: &mut Value, instance: &InstanceSpec) {
    if let Some(Value::Array(write_to)) = get_path_mut(document, &["Serilog", "WriteTo"]) {
        for sink_group in write_to {
            let Some(Value::Array(configure)) = get_path_mut(sink_group, &["Args", "configure"])
            else {
                continue;
            };
            for sink in configure {
                if sink.get("Name").and_then(Value::as_str) != Some(FILE_SINK_NAME) {
                    continue;
                }
                let Some(path_value) = get_path_mut(sink, &["Args", "path"]) else {
                    continue;
                };
                let Some(original) = path_value.as_str() else {
                    continue;
                };
                if original.is_empty() {
                    continue;
                }
                *path_value = Value::String(sink_log_path(&instance.log_path, original));
            }
        }
    }

    if let Some(Value::Object(properties)) = get_path_mut(document, &["Serilog", "Properties"]) {
        properties.insert(
            "Application".to_string(),
            Value::String(format!("Pyxoom.Analytix.Queue.{}", instance.instance_name)),
        );
    }
}

/// Join the instance log directory with the base file name of the original
/// sink path, normalizing separators to forward slashes.
fn sink_log_path(log_dir: &str, original_path: &str) -> String {
    let normalized = original_path.replace('\\', "/");
    let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);
    let dir = log_dir.trim_end_matches(['/', '\\']);
    format!("{}/{}", dir, file_name).replace('\\', "/")
}

/// Apply the free-form colon-delimited overrides, last.
fn apply_custom_settings(document: &mut Value, instance: &InstanceSpec) -> Result<()> {
    for (key_path, value) in &instance.custom_settings {
        let segments: Vec<&str> = key_path.split(':').collect();
        let (leaf, parents) = segments.split_last().ok_or_else(|| Error::Patch {
            message: format!("empty override key path: '{}'", key_path),
        })?;
        let target = ensure_object_path(document, parents)?;
        target.insert(leaf.to_string(), Value::String(value.clone()));
    }
    Ok(())
}
