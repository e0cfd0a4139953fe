//! Tool Registry

use crate::{ToolContext, ToolMeta, ToolOutput, ToolPlugin};
use metron_core::ErrorReport;
use serde_json::{json, Value as JsonValue};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Error code for calls naming a tool that was never registered
pub const UNKNOWN_TOOL: &str = "UNKNOWN_TOOL";

/// Central tool registry
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn ToolPlugin>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: BTreeMap::new() }
    }

    pub fn with_tool<T: ToolPlugin + 'static>(mut self, tool: T) -> Self {
        let name = tool.meta().name.to_lowercase();
        self.tools.insert(name, Arc::new(tool));
        self
    }

    pub fn get_tool(&self, name: &str) -> Option<&dyn ToolPlugin> {
        self.tools.get(&name.to_lowercase()).map(|t| t.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Metadata for every tool, sorted by name
    pub fn list(&self) -> Vec<ToolMeta> {
        self.tools.values().map(|t| t.meta()).collect()
    }

    pub fn call_tool(&self, name: &str, args: &JsonValue, ctx: &ToolContext) -> Result<ToolOutput, ErrorReport> {
        match self.get_tool(name) {
            Some(tool) => tool.call(args, ctx),
            None => Err(self.unknown_tool(name)),
        }
    }

    /// Error for an unregistered tool, with similar names as a suggestion
    pub fn unknown_tool(&self, name: &str) -> ErrorReport {
        let mut err = ErrorReport::new(UNKNOWN_TOOL, format!("Unknown tool: {}", name));
        let similar = self.find_similar_tools(name);
        if !similar.is_empty() {
            let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
            err = err.with_suggestion(format!(
                "Similar: {}. Use tools/list for the full list.",
                suggestions.join(", ")
            ));
        }
        err
    }

    /// Find tool names similar to the given name (for error suggestions)
    fn find_similar_tools(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.tools.keys()
            .filter_map(|tool_name| {
                let score = Self::similarity_score(&name_lower, tool_name);
                if score > 0 {
                    Some((tool_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two strings
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        // Shared characters
        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        score += common * 2;

        let len_diff = (query.len() as i32 - candidate.len() as i32).unsigned_abs() as usize;
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    /// Detailed help for one tool
    pub fn help(&self, name: &str) -> Result<JsonValue, ErrorReport> {
        let tool = self.get_tool(name).ok_or_else(|| self.unknown_tool(name))?;
        let meta = tool.meta();
        Ok(json!({
            "name": meta.name,
            "description": meta.description,
            "usage": meta.usage,
            "returns": meta.returns,
            "category": meta.category,
            "args": meta.args,
            "examples": meta.examples,
            "related": meta.related,
        }))
    }
}
