use std::fmt;

use serde::Serialize;

use crate::analysis::boundness::{BoundnessResult, check_boundness};
use crate::analysis::coverability::{CoverabilityTree, NodeTag};
use crate::net::ids::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Positive,
    Negative,
}

impl Status {
    pub fn symbol(self) -> char {
        match self {
            Status::Positive => '✓',
            Status::Negative => '✗',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub status: Status,
    pub detail: String,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.symbol(), self.detail)
    }
}

/// Properties read off every node of a coverability tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyReport {
    pub boundness: BoundnessResult,
    pub dead_end_nodes: Vec<NodeId>,
    pub old_nodes: Vec<NodeId>,
    pub total_nodes: usize,
}

pub fn analyze(tree: &CoverabilityTree) -> PropertyReport {
    let tagged = |tag: NodeTag| -> Vec<NodeId> {
        tree.nodes()
            .filter(|node| node.tag == tag)
            .map(|node| node.id)
            .collect()
    };
    let report = PropertyReport {
        boundness: check_boundness(tree),
        dead_end_nodes: tagged(NodeTag::DeadEnd),
        old_nodes: tagged(NodeTag::Old),
        total_nodes: tree.len(),
    };
    log::debug!(
        "analyzed {} nodes: bounded={}, dead ends={}, old={}",
        report.total_nodes,
        report.is_bounded(),
        report.dead_end_count(),
        report.old_count()
    );
    report
}

impl PropertyReport {
    pub fn is_bounded(&self) -> bool {
        self.boundness.is_bounded()
    }

    pub fn unbounded_places(&self) -> &[String] {
        match &self.boundness {
            BoundnessResult::Bounded => &[],
            BoundnessResult::Unbounded {
                unbounded_places, ..
            } => unbounded_places,
        }
    }

    pub fn dead_end_count(&self) -> usize {
        self.dead_end_nodes.len()
    }

    pub fn old_count(&self) -> usize {
        self.old_nodes.len()
    }

    /// Boundedness, then dead ends, then old nodes.
    pub fn lines(&self) -> [StatusLine; 3] {
        let boundness = if self.is_bounded() {
            StatusLine {
                status: Status::Positive,
                detail: "Network is BOUNDED (all places are bounded)".to_string(),
            }
        } else {
            StatusLine {
                status: Status::Negative,
                detail: format!(
                    "Network is UNBOUNDED (unbounded places: {})",
                    self.unbounded_places().join(", ")
                ),
            }
        };
        let dead_ends = match self.dead_end_count() {
            0 => StatusLine {
                status: Status::Positive,
                detail: "No dead-end nodes".to_string(),
            },
            n => StatusLine {
                status: Status::Negative,
                detail: format!("Dead-end nodes found: {n}"),
            },
        };
        // Repeated markings are the normal way a branch closes.
        let old = match self.old_count() {
            0 => "No old nodes".to_string(),
            n => format!("Old nodes found: {n}"),
        };
        [
            boundness,
            dead_ends,
            StatusLine {
                status: Status::Positive,
                detail: old,
            },
        ]
    }
}

impl fmt::Display for PropertyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [boundness, dead_ends, old] = self.lines();
        write!(f, "{boundness}\n{dead_ends}\n{old}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::description::{NetDescription, TransitionDescription};

    #[test]
    fn dead_root_report() {
        let net = NetDescription::new()
            .place("P0", 0)
            .transition(TransitionDescription::new("t1").consumes("P0", 1))
            .build()
            .unwrap();
        let report = analyze(&CoverabilityTree::build(&net).unwrap());
        assert!(report.is_bounded());
        assert_eq!(report.dead_end_nodes, vec![NodeId::new(0)]);
        assert_eq!(
            report.to_string(),
            "✓ Network is BOUNDED (all places are bounded)\n\
             ✗ Dead-end nodes found: 1\n\
             ✓ No old nodes"
        );
    }

    #[test]
    fn unbounded_report_lists_places() {
        let net = NetDescription::new()
            .place("P0", 1)
            .place("P1", 0)
            .transition(
                TransitionDescription::new("gen")
                    .consumes("P0", 1)
                    .produces("P0", 1)
                    .produces("P1", 1),
            )
            .build()
            .unwrap();
        let report = analyze(&CoverabilityTree::build(&net).unwrap());
        let [boundness, dead_ends, old] = report.lines();
        assert_eq!(boundness.status, Status::Negative);
        assert_eq!(boundness.detail, "Network is UNBOUNDED (unbounded places: P1)");
        assert_eq!(dead_ends.status, Status::Positive);
        assert_eq!(old.detail, "Old nodes found: 1");
    }

    #[test]
    fn report_serializes() {
        let net = NetDescription::new().place("P0", 0).build().unwrap();
        let report = analyze(&CoverabilityTree::build(&net).unwrap());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["boundness"]["status"], "bounded");
        assert_eq!(json["dead_end_nodes"], serde_json::json!([0]));
    }
}
