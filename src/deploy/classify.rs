// ABOUTME: Decides whether an errors payload is empty and renders it for humans.
// ABOUTME: Used by the wait loops to turn VALIDATED or FAILED snapshots into failures.

use crate::client::{DeploymentStatus, ErrorsPayload};

/// Whether the payload reports at least one error.
///
/// A string counts as empty when it trims to nothing, `{}` or `[]`. A map with
/// keys counts as non-empty even if every list under it is empty.
pub fn has_errors(payload: &ErrorsPayload) -> bool {
    match payload {
        ErrorsPayload::Absent => false,
        ErrorsPayload::List(items) => !items.is_empty(),
        ErrorsPayload::Map(map) => !map.is_empty(),
        ErrorsPayload::Text(text) => !matches!(text.trim(), "" | "{}" | "[]"),
    }
}

/// Render the deployment's errors, including component-level ones, as an indented block.
pub fn format_errors(status: &DeploymentStatus) -> String {
    let mut lines = Vec::new();
    match &status.deployment_name {
        Some(name) if !name.trim().is_empty() => {
            lines.push(format!("Deployment {} ({})", status.id(), name.trim()));
        }
        _ => lines.push(format!("Deployment {}", status.id())),
    }

    push_payload(&mut lines, &status.errors, "");

    for component in &status.deployed_component_versions {
        if !has_errors(&component.errors) {
            continue;
        }
        let label = component
            .purl
            .as_deref()
            .or(component.name.as_deref())
            .unwrap_or("<unnamed component>");
        lines.push(format!("  {label}:"));
        push_payload(&mut lines, &component.errors, "  ");
    }

    lines.join("\n")
}

fn push_payload(lines: &mut Vec<String>, payload: &ErrorsPayload, indent: &str) {
    match payload {
        ErrorsPayload::Absent => {}
        ErrorsPayload::List(items) => {
            for item in items {
                lines.push(format!("{indent}  - {item}"));
            }
        }
        ErrorsPayload::Map(map) => {
            for (key, errors) in map {
                lines.push(format!("{indent}  {key}:"));
                for error in errors {
                    lines.push(format!("{indent}    - {error}"));
                }
            }
        }
        ErrorsPayload::Text(text) => {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(format!("{indent}  {text}"));
            }
        }
    }
}
