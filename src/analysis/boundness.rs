//! Boundedness read off a finished coverability tree.
//!
//! A place is unbounded iff some node of the tree carries ω on it. Every node
//! is scanned, not only the leaves.
use std::fmt;

use indexmap::IndexSet;
use serde::Serialize;

use crate::analysis::coverability::CoverabilityTree;
use crate::net::ids::PlaceId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum BoundnessResult {
    Bounded,
    Unbounded {
        /// Place names in the order ω was first met (creation order of nodes).
        unbounded_places: Vec<String>,
        /// Transitions leading from the root to the first node carrying ω.
        witness_sequence: Vec<String>,
    },
}

impl BoundnessResult {
    pub fn is_bounded(&self) -> bool {
        matches!(self, BoundnessResult::Bounded)
    }
}

impl fmt::Display for BoundnessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundnessResult::Bounded => write!(f, "the net is bounded"),
            BoundnessResult::Unbounded {
                unbounded_places,
                witness_sequence,
            } => {
                write!(f, "the net is unbounded on {}", unbounded_places.join(", "))?;
                if !witness_sequence.is_empty() {
                    write!(f, " (witness: {})", witness_sequence.join(" "))?;
                }
                Ok(())
            }
        }
    }
}

/// Places observed with ω, deduplicated, first-encountered order.
pub fn unbounded_places(tree: &CoverabilityTree) -> IndexSet<PlaceId> {
    tree.nodes()
        .flat_map(|node| node.marking.omega_places())
        .collect()
}

pub fn check_boundness(tree: &CoverabilityTree) -> BoundnessResult {
    let places = unbounded_places(tree);
    let Some(first) = tree.nodes().find(|node| node.marking.has_omega()) else {
        return BoundnessResult::Bounded;
    };
    BoundnessResult::Unbounded {
        unbounded_places: places
            .into_iter()
            .map(|place| tree.place_name(place).to_string())
            .collect(),
        witness_sequence: tree
            .firing_sequence(first.id)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

/// Whether `place` keeps a finite token count in every node.
pub fn is_place_bounded(tree: &CoverabilityTree, place: PlaceId) -> bool {
    tree.nodes().all(|node| !node.marking.tokens(place).is_omega())
}
