//! Plain-data outputs handed to whoever presents the results.
pub mod properties;
pub mod tree;

use serde::Serialize;

use crate::analysis::coverability::CoverabilityTree;

pub use properties::{PropertyReport, Status, StatusLine, analyze};
pub use tree::{RenderOptions, dot, render, render_with, write_dot};

/// Rendered tree plus property report, the two outputs of one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'a> {
    pub tree: &'a CoverabilityTree,
    pub properties: PropertyReport,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(tree: &'a CoverabilityTree) -> Self {
        Self {
            tree,
            properties: analyze(tree),
        }
    }

    pub fn to_text(&self, options: &RenderOptions) -> String {
        format!(
            "=== COVERABILITY TREE ===\n{}\n\n=== PROPERTIES ===\n{}\n",
            render_with(self.tree, options),
            self.properties
        )
    }
}
