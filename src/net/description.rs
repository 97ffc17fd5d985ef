//! Unvalidated net input and its validation into a [`Net`].
//!
//! A [`NetDescription`] is what a loader or parser produces. Nothing in it is
//! trusted: [`NetDescription::build`] checks the whole description and either
//! returns a [`Net`] or one [`ValidationError`] listing every problem found.
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::core::Net;
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::IndexVec;
use crate::net::structure::{Place, Transition, Weight};

/// `(place, weight)` pairs in input order. Serialized as a map, but repeated
/// places are kept so that validation can reject them.
pub type Arcs = Vec<(String, i64)>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDescription {
    pub name: String,
    #[serde(default, with = "arc_map")]
    pub consumes: Arcs,
    #[serde(default, with = "arc_map")]
    pub produces: Arcs,
}

mod arc_map {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use super::Arcs;

    pub fn serialize<S: Serializer>(arcs: &Arcs, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(arcs.iter().map(|(place, weight)| (place, weight)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arcs, D::Error> {
        struct ArcVisitor;

        impl<'de> Visitor<'de> for ArcVisitor {
            type Value = Arcs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from place names to arc weights")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Arcs, A::Error> {
                let mut arcs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    arcs.push(entry);
                }
                Ok(arcs)
            }
        }

        deserializer.deserialize_map(ArcVisitor)
    }
}

impl TransitionDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn consumes(mut self, place: impl Into<String>, weight: i64) -> Self {
        self.consumes.push((place.into(), weight));
        self
    }

    pub fn produces(mut self, place: impl Into<String>, weight: i64) -> Self {
        self.produces.push((place.into(), weight));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDescription {
    pub places: Vec<String>,
    pub initial_marking: Vec<i64>,
    #[serde(default)]
    pub transitions: Vec<TransitionDescription>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSide {
    Consumes,
    Produces,
}

impl fmt::Display for ArcSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArcSide::Consumes => "consumes",
            ArcSide::Produces => "produces",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("the net has no places")]
    NoPlaces,
    #[error("place #{0} has an empty name")]
    EmptyPlaceName(usize),
    #[error("place `{0}` is declared more than once")]
    DuplicatePlace(String),
    #[error("initial marking has {found} entries but there are {expected} places")]
    MarkingLength { expected: usize, found: usize },
    #[error("initial marking of `{place}` is negative ({value})")]
    NegativeTokens { place: String, value: i64 },
    #[error("transition #{0} has an empty name")]
    EmptyTransitionName(usize),
    #[error("transition `{0}` is declared more than once")]
    DuplicateTransition(String),
    #[error("transition `{transition}` {side} unknown place `{place}`")]
    UnknownPlace {
        transition: String,
        side: ArcSide,
        place: String,
    },
    #[error("transition `{transition}` {side} `{place}` more than once")]
    DuplicateArc {
        transition: String,
        side: ArcSide,
        place: String,
    },
    #[error("transition `{transition}` {side} `{place}` with non-positive weight {weight}")]
    NonPositiveWeight {
        transition: String,
        side: ArcSide,
        place: String,
        weight: i64,
    },
}

/// Every problem found in a [`NetDescription`], in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid net description ({} issue", self.issues.len())?;
        if self.issues.len() != 1 {
            f.write_str("s")?;
        }
        f.write_str(")")?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl NetDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a place together with its initial token count.
    pub fn place(mut self, name: impl Into<String>, tokens: i64) -> Self {
        self.places.push(name.into());
        self.initial_marking.push(tokens);
        self
    }

    pub fn transition(mut self, transition: TransitionDescription) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Collects every structural problem; empty when the description is valid.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.places.is_empty() {
            issues.push(ValidationIssue::NoPlaces);
        }
        let mut seen = HashSet::new();
        for (idx, name) in self.places.iter().enumerate() {
            if name.trim().is_empty() {
                issues.push(ValidationIssue::EmptyPlaceName(idx));
            } else if !seen.insert(name.as_str()) {
                issues.push(ValidationIssue::DuplicatePlace(name.clone()));
            }
        }

        if self.initial_marking.len() != self.places.len() {
            issues.push(ValidationIssue::MarkingLength {
                expected: self.places.len(),
                found: self.initial_marking.len(),
            });
        }
        for (name, &value) in self.places.iter().zip(&self.initial_marking) {
            if value < 0 {
                issues.push(ValidationIssue::NegativeTokens {
                    place: name.clone(),
                    value,
                });
            }
        }

        let mut seen_transitions = HashSet::new();
        for (idx, transition) in self.transitions.iter().enumerate() {
            if transition.name.trim().is_empty() {
                issues.push(ValidationIssue::EmptyTransitionName(idx));
            } else if !seen_transitions.insert(transition.name.as_str()) {
                issues.push(ValidationIssue::DuplicateTransition(transition.name.clone()));
            }
            for (side, arcs) in [
                (ArcSide::Consumes, &transition.consumes),
                (ArcSide::Produces, &transition.produces),
            ] {
                let mut seen_arcs = HashSet::new();
                for (place, weight) in arcs {
                    let weight = *weight;
                    if !seen_arcs.insert(place.as_str()) {
                        issues.push(ValidationIssue::DuplicateArc {
                            transition: transition.name.clone(),
                            side,
                            place: place.clone(),
                        });
                    }
                    if !seen.contains(place.as_str()) {
                        issues.push(ValidationIssue::UnknownPlace {
                            transition: transition.name.clone(),
                            side,
                            place: place.clone(),
                        });
                    }
                    if weight <= 0 {
                        issues.push(ValidationIssue::NonPositiveWeight {
                            transition: transition.name.clone(),
                            side,
                            place: place.clone(),
                            weight,
                        });
                    }
                }
            }
        }

        issues
    }

    /// Validates the description and builds the immutable [`Net`].
    pub fn build(&self) -> Result<Net, ValidationError> {
        let issues = self.validate();
        if !issues.is_empty() {
            log::debug!("rejecting net description: {} issue(s)", issues.len());
            return Err(ValidationError { issues });
        }

        let places: IndexVec<PlaceId, Place> = self
            .places
            .iter()
            .zip(&self.initial_marking)
            .map(|(name, &tokens)| Place::new(name.clone(), tokens as Weight))
            .collect();
        let place_ids: IndexMap<&str, PlaceId> = places
            .iter_enumerated()
            .map(|(id, place)| (place.name.as_str(), id))
            .collect();

        let mut pre = Incidence::new(places.len(), self.transitions.len(), 0);
        let mut post = Incidence::new(places.len(), self.transitions.len(), 0);
        let mut transitions: IndexVec<TransitionId, Transition> =
            IndexVec::with_capacity(self.transitions.len());
        for description in &self.transitions {
            let id = transitions.push(Transition::new(description.name.clone()));
            for (place, weight) in &description.consumes {
                pre.set(place_ids[place.as_str()], id, *weight as Weight);
            }
            for (place, weight) in &description.produces {
                post.set(place_ids[place.as_str()], id, *weight as Weight);
            }
        }

        let net = Net::from_parts(places, transitions, pre, post);
        log::debug!(
            "built net with {} places and {} transitions",
            net.places_len(),
            net.transitions_len()
        );
        Ok(net)
    }
}
