//! Output formatting utilities

use serde::Serialize;
use sixdeg_core::{Entity, RelationKind, ResolvedPath, ResolvedStep};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Pretty JSON for `data`
pub fn to_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// `Name (id)`, falling back to the id alone when the name is unknown
pub fn entity_label(step: &ResolvedStep) -> String {
    if step.name.is_empty() {
        format!("#{}", step.entity)
    } else {
        format!("{} ({})", step.name, step.entity)
    }
}

/// The `-[group: A New Hope]->` arrow leading into `step`
pub fn relation_arrow(kind: RelationKind, relation: u64, label: &str) -> String {
    if label.is_empty() {
        format!("-[{} #{}]->", kind, relation)
    } else {
        format!("-[{}: {}]->", kind, label)
    }
}

/// One line for the reference, then one line per hop
pub fn path_lines(path: &ResolvedPath) -> Vec<String> {
    let mut lines = Vec::with_capacity(path.len());
    if let Some(first) = path.first() {
        lines.push(format!("  {}", entity_label(first)));
    }
    for (_, next) in path.links() {
        lines.push(format!(
            "    {} {}",
            relation_arrow(next.kind, next.relation.0, &next.relation_label),
            entity_label(next)
        ));
    }
    lines
}

/// Aligned id and name columns
pub fn entity_table(entities: &[Entity]) -> Vec<String> {
    let width = entities
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(0);
    entities
        .iter()
        .map(|e| format!("  {:>width$}  {}", e.id.to_string(), e.name, width = width))
        .collect()
}
