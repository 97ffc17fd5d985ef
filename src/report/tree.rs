//! Text and Graphviz renderings of a coverability tree.
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;

use crate::analysis::coverability::{CoverabilityTree, NodeTag, TreeNode};
use crate::net::ids::{NodeId, TransitionId};
use crate::net::omega::OMEGA;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Printed in place of ω; must not look like a number.
    pub omega_symbol: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            omega_symbol: OMEGA.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn ascii() -> Self {
        Self {
            omega_symbol: "w".to_string(),
        }
    }
}

fn tag_suffix(tag: NodeTag) -> Option<NodeTag> {
    matches!(tag, NodeTag::Old | NodeTag::DeadEnd).then_some(tag)
}

fn node_line(tree: &CoverabilityTree, node: &TreeNode, options: &RenderOptions) -> String {
    let mut line = format!(
        "Node {}: {}",
        node.id,
        node.marking.display_with(&options.omega_symbol)
    );
    if let (Some(parent), Some(transition)) = (node.parent, node.transition) {
        let _ = write!(
            line,
            "  (← {} from Node {})",
            tree.transition_name(transition),
            parent
        );
    }
    if let Some(tag) = tag_suffix(node.tag) {
        let _ = write!(line, " [{tag}]");
    }
    line
}

/// Pre-order listing, two spaces of indentation per level.
pub fn render(tree: &CoverabilityTree) -> String {
    render_with(tree, &RenderOptions::default())
}

pub fn render_with(tree: &CoverabilityTree, options: &RenderOptions) -> String {
    let mut lines = Vec::with_capacity(tree.len());
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let node = &tree[id];
        lines.push(format!("{}{}", "  ".repeat(depth), node_line(tree, node, options)));
        stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
    }
    lines.join("\n")
}

/// The tree as a `petgraph` graph; node indices coincide with [`NodeId`]s.
pub fn to_graph(tree: &CoverabilityTree) -> DiGraph<NodeId, TransitionId> {
    let mut graph = DiGraph::with_capacity(tree.len(), tree.edges().len());
    for node in tree.nodes() {
        graph.add_node(node.id);
    }
    for edge in tree.edges() {
        graph.add_edge(
            petgraph::graph::NodeIndex::new(edge.parent.raw() as usize),
            petgraph::graph::NodeIndex::new(edge.child.raw() as usize),
            edge.transition,
        );
    }
    graph
}

pub fn dot(tree: &CoverabilityTree, options: &RenderOptions) -> String {
    fn escape(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }

    let graph = to_graph(tree);
    format!(
        "{:?}",
        Dot::with_attr_getters(
            &graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, edge| format!("label=\"{}\"", escape(tree.transition_name(*edge.weight()))),
            &|_, (_, id)| {
                let node = &tree[*id];
                let mut label = format!(
                    "n{}\\n{}",
                    node.id,
                    escape(&node.marking.display_with(&options.omega_symbol))
                );
                let shape = match node.tag {
                    NodeTag::Old => {
                        label.push_str("\\nold");
                        "style=dashed"
                    }
                    NodeTag::DeadEnd => {
                        label.push_str("\\ndead-end");
                        "style=filled, fillcolor=\"#ffcdd2\""
                    }
                    _ => "",
                };
                format!("label=\"{label}\" {shape}")
            },
        )
    )
}

pub fn write_dot<P: AsRef<Path>>(
    tree: &CoverabilityTree,
    options: &RenderOptions,
    path: P,
) -> std::io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, dot(tree, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::description::{NetDescription, TransitionDescription};

    fn pump_tree() -> CoverabilityTree {
        let net = NetDescription::new()
            .place("P0", 1)
            .transition(TransitionDescription::new("t1").consumes("P0", 1).produces("P0", 2))
            .build()
            .unwrap();
        CoverabilityTree::build(&net).unwrap()
    }

    #[test]
    fn renders_pre_order_with_tags() {
        let expected = "\
Node 0: [1]
  Node 1: [ω]  (← t1 from Node 0)
    Node 2: [ω]  (← t1 from Node 1) [old]";
        assert_eq!(render(&pump_tree()), expected);
    }

    #[test]
    fn children_follow_creation_order() {
        let net = NetDescription::new()
            .place("A", 1)
            .place("B", 0)
            .place("C", 0)
            .transition(TransitionDescription::new("toB").consumes("A", 1).produces("B", 1))
            .transition(TransitionDescription::new("toC").consumes("A", 1).produces("C", 1))
            .build()
            .unwrap();
        let tree = CoverabilityTree::build(&net).unwrap();
        let expected = "\
Node 0: [1, 0, 0]
  Node 1: [0, 1, 0]  (← toB from Node 0) [dead-end]
  Node 2: [0, 0, 1]  (← toC from Node 0) [dead-end]";
        assert_eq!(render(&tree), expected);
    }

    #[test]
    fn ascii_option_replaces_omega() {
        let text = render_with(&pump_tree(), &RenderOptions::ascii());
        assert!(text.contains("[w]"));
        assert!(!text.contains('ω'));
    }

    #[test]
    fn dot_contains_every_node_and_edge() {
        let tree = pump_tree();
        let graph = to_graph(&tree);
        assert_eq!((graph.node_count(), graph.edge_count()), (3, 2));
        let dot = dot(&tree, &RenderOptions::default());
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("label=\"t1\""));
        assert!(dot.contains("n2\\n[ω]\\nold"));
    }
}
