//! Karp-Miller coverability tree construction.
//!
//! Nodes are expanded breadth-first in creation order. For each dequeued node:
//!
//! 1. if its marking equals the marking of a proper ancestor it is tagged
//!    [`NodeTag::Old`] and not expanded;
//! 2. if no transition is enabled it is tagged [`NodeTag::DeadEnd`];
//! 3. otherwise it is tagged [`NodeTag::Processed`] and one child is created per
//!    enabled transition, in definition order. Before a child is created its
//!    marking is accelerated against the first node on the root-to-parent path
//!    it strictly covers.
//!
//! Only the node's own path to the root is ever inspected: equal markings in
//! sibling subtrees are expanded independently.
use std::collections::VecDeque;
use std::fmt;
use std::ops::Index;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::net::core::{FireError, Net};
use crate::net::ids::{NodeId, PlaceId, TransitionId};
use crate::net::index_vec::IndexVec;
use crate::net::structure::Marking;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeTag {
    New,
    /// Expanded; has at least one child.
    Processed,
    /// Marking repeats an ancestor's; expansion stopped.
    Old,
    /// No transition enabled.
    DeadEnd,
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeTag::New => "new",
            NodeTag::Processed => "processed",
            NodeTag::Old => "old",
            NodeTag::DeadEnd => "dead-end",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub marking: Marking,
    pub tag: NodeTag,
    pub parent: Option<NodeId>,
    /// Transition fired in `parent` to reach this node.
    pub transition: Option<TransitionId>,
    pub children: Vec<NodeId>,
}

impl TreeNode {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TreeEdge {
    pub parent: NodeId,
    pub child: NodeId,
    pub transition: TransitionId,
}

/// Arena of [`TreeNode`]s rooted at node 0.
///
/// Children are owned through the arena; `parent` links are plain ids used
/// for the upward walks of the ancestor checks.
#[derive(Debug, Clone, Serialize)]
pub struct CoverabilityTree {
    nodes: IndexVec<NodeId, TreeNode>,
    edges: Vec<TreeEdge>,
    places: IndexVec<PlaceId, String>,
    transitions: IndexVec<TransitionId, String>,
}

impl CoverabilityTree {
    /// Builds the tree of `net` without any budget.
    pub fn build(net: &Net) -> Result<Self, BuildError> {
        CoverabilityBuilder::new(net).build()
    }

    fn with_root(net: &Net) -> Self {
        let mut tree = Self {
            nodes: IndexVec::new(),
            edges: Vec::new(),
            places: net.places().iter().map(|place| place.name.clone()).collect(),
            transitions: net
                .transitions()
                .iter()
                .map(|transition| transition.name.clone())
                .collect(),
        };
        tree.push_node(net.initial_marking(), None);
        tree
    }

    fn push_node(&mut self, marking: Marking, origin: Option<(NodeId, TransitionId)>) -> NodeId {
        let id = self.nodes.next_index();
        self.nodes.push(TreeNode {
            id,
            marking,
            tag: NodeTag::New,
            parent: origin.map(|(parent, _)| parent),
            transition: origin.map(|(_, transition)| transition),
            children: Vec::new(),
        });
        if let Some((parent, transition)) = origin {
            self.nodes[parent].children.push(id);
            self.edges.push(TreeEdge {
                parent,
                child: id,
                transition,
            });
        }
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.iter()
    }

    /// `(parent, child, transition)` edges in creation order.
    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }

    pub fn place_names(&self) -> &IndexVec<PlaceId, String> {
        &self.places
    }

    pub fn place_name(&self, place: PlaceId) -> &str {
        &self.places[place]
    }

    pub fn transition_name(&self, transition: TransitionId) -> &str {
        &self.transitions[transition]
    }

    /// Proper ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, |&node| self.nodes[node].parent)
    }

    /// Root-to-`id` path, both ends inclusive.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(id).collect();
        path.reverse();
        path.push(id);
        path
    }

    /// Transitions fired along the path from the root to `id`.
    pub fn firing_sequence(&self, id: NodeId) -> Vec<&str> {
        self.path_to_root(id)
            .into_iter()
            .filter_map(|node| self.nodes[node].transition)
            .map(|transition| self.transition_name(transition))
            .collect()
    }

    pub fn count_tagged(&self, tag: NodeTag) -> usize {
        self.nodes.iter().filter(|node| node.tag == tag).count()
    }

    fn equal_ancestor(&self, id: NodeId) -> Option<NodeId> {
        let marking = &self.nodes[id].marking;
        self.ancestors(id)
            .find(|&ancestor| marking.compare(&self.nodes[ancestor].marking).equal)
    }
}

impl Index<NodeId> for CoverabilityTree {
    type Output = TreeNode;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    Nodes(usize),
    Duration(Duration),
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Nodes(limit) => write!(f, "node limit {limit}"),
            Budget::Duration(limit) => write!(f, "time limit {limit:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("coverability tree build aborted: {budget} exceeded after {nodes} nodes")]
    BudgetExceeded { budget: Budget, nodes: usize },
    /// A finite count overflowed while firing an enabled transition.
    #[error("firing failed during tree construction: {0}")]
    Fire(#[from] FireError),
}

/// Optional caps on tree construction. The default is unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildLimits {
    /// Maximum number of nodes, root included. `Some(0)` fails before the
    /// root is created.
    pub max_nodes: Option<usize>,
    pub max_duration: Option<Duration>,
}

pub struct CoverabilityBuilder<'net> {
    net: &'net Net,
    limits: BuildLimits,
}

impl<'net> CoverabilityBuilder<'net> {
    pub fn new(net: &'net Net) -> Self {
        Self {
            net,
            limits: BuildLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: BuildLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_nodes(mut self, limit: Option<usize>) -> Self {
        self.limits.max_nodes = limit;
        self
    }

    pub fn with_max_duration(mut self, limit: Option<Duration>) -> Self {
        self.limits.max_duration = limit;
        self
    }

    pub fn build(&self) -> Result<CoverabilityTree, BuildError> {
        let started = Instant::now();
        if self.limits.max_nodes == Some(0) {
            return Err(self.exceeded(Budget::Nodes(0), 0));
        }
        let mut tree = CoverabilityTree::with_root(self.net);
        let mut queue = VecDeque::from([tree.root()]);

        while let Some(current) = queue.pop_front() {
            self.check_deadline(started, tree.len())?;

            if let Some(ancestor) = tree.equal_ancestor(current) {
                log::debug!("node {current}: repeats ancestor {ancestor}, tagged old");
                tree.nodes[current].tag = NodeTag::Old;
                continue;
            }

            let enabled = self.net.enabled_transitions(&tree.nodes[current].marking);
            if enabled.is_empty() {
                log::debug!("node {current}: {} is a dead end", tree.nodes[current].marking);
                tree.nodes[current].tag = NodeTag::DeadEnd;
                continue;
            }

            tree.nodes[current].tag = NodeTag::Processed;
            let path = tree.path_to_root(current);
            for transition in enabled {
                let mut successor = self
                    .net
                    .fire_transition(transition, &tree.nodes[current].marking)
                    .inspect_err(|err| {
                        debug_assert!(
                            !matches!(err, FireError::NotEnabled(_)),
                            "enabled transition rejected by fire: {err}"
                        );
                        log::error!("node {current}: firing enabled transition failed: {err}")
                    })?;

                let covered = path.iter().copied().find(|&ancestor| {
                    successor
                        .compare(&tree.nodes[ancestor].marking)
                        .strictly_covers()
                });
                if let Some(ancestor) = covered {
                    let before = successor.clone();
                    successor.accelerate(&tree.nodes[ancestor].marking);
                    if successor != before {
                        log::debug!(
                            "node {current}: {before} covers node {ancestor}, accelerated to {successor}"
                        );
                    }
                }

                if let Some(limit) = self.limits.max_nodes {
                    if tree.len() >= limit {
                        return Err(self.exceeded(Budget::Nodes(limit), tree.len()));
                    }
                }
                let child = tree.push_node(successor, Some((current, transition)));
                queue.push_back(child);
            }
        }

        log::info!(
            "coverability tree built: {} nodes, {} edges in {:?}",
            tree.len(),
            tree.edges.len(),
            started.elapsed()
        );
        Ok(tree)
    }

    fn check_deadline(&self, started: Instant, nodes: usize) -> Result<(), BuildError> {
        match self.limits.max_duration {
            Some(limit) if started.elapsed() > limit => {
                Err(self.exceeded(Budget::Duration(limit), nodes))
            }
            _ => Ok(()),
        }
    }

    fn exceeded(&self, budget: Budget, nodes: usize) -> BuildError {
        log::warn!("aborting coverability tree: {budget} exceeded after {nodes} nodes");
        BuildError::BudgetExceeded { budget, nodes }
    }
}
