//! Runtime semantics: enabled sets and firing over ω-markings.
use indexmap::IndexMap;
use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::omega::Tokens;
use crate::net::structure::{Marking, Place, Transition, Weight};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FireError {
    #[error("unknown transition `{0}`")]
    UnknownTransition(String),
    #[error("transition `{0}` is not enabled under the supplied marking")]
    NotEnabled(String),
    #[error("token count overflow at place `{place}` while firing `{transition}`")]
    Overflow { place: String, transition: String },
    #[error("marking has {found} entries but the net has {expected} places")]
    LengthMismatch { expected: usize, found: usize },
}

/// An immutable place/transition net.
///
/// Built only through [`NetDescription::build`](crate::net::NetDescription::build),
/// so every `Net` is structurally valid: unique names, at least one place,
/// positive arc weights on known places.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Net {
    places: IndexVec<PlaceId, Place>,
    transitions: IndexVec<TransitionId, Transition>,
    #[serde(skip)]
    transition_ids: IndexMap<String, TransitionId>,
    pre: Incidence<Weight>,
    post: Incidence<Weight>,
}

impl Net {
    /// Assembles a net from already validated parts.
    pub(crate) fn from_parts(
        places: IndexVec<PlaceId, Place>,
        transitions: IndexVec<TransitionId, Transition>,
        pre: Incidence<Weight>,
        post: Incidence<Weight>,
    ) -> Self {
        debug_assert_eq!(pre.places(), places.len());
        debug_assert_eq!(post.transitions(), transitions.len());
        let transition_ids = transitions
            .iter_enumerated()
            .map(|(id, transition)| (transition.name.clone(), id))
            .collect();
        Self {
            places,
            transitions,
            transition_ids,
            pre,
            post,
        }
    }

    pub fn places(&self) -> &IndexVec<PlaceId, Place> {
        &self.places
    }

    pub fn transitions(&self) -> &IndexVec<TransitionId, Transition> {
        &self.transitions
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    pub fn place_name(&self, place: PlaceId) -> &str {
        &self.places[place].name
    }

    pub fn transition_name(&self, transition: TransitionId) -> &str {
        &self.transitions[transition].name
    }

    pub fn transition_id(&self, name: &str) -> Option<TransitionId> {
        self.transition_ids.get(name).copied()
    }

    pub fn place_id(&self, name: &str) -> Option<PlaceId> {
        self.places
            .iter_enumerated()
            .find(|(_, place)| place.name == name)
            .map(|(id, _)| id)
    }

    /// Input arcs of `transition`: `(place, weight)` with weight > 0.
    pub fn consumes(&self, transition: TransitionId) -> impl Iterator<Item = (PlaceId, Weight)> + '_ {
        self.pre.column(transition)
    }

    /// Output arcs of `transition`: `(place, weight)` with weight > 0.
    pub fn produces(&self, transition: TransitionId) -> impl Iterator<Item = (PlaceId, Weight)> + '_ {
        self.post.column(transition)
    }

    pub fn initial_marking(&self) -> Marking {
        self.places
            .iter()
            .map(|place| Tokens::Finite(place.tokens))
            .collect()
    }

    /// `false` for unknown transitions; otherwise every input place holds
    /// at least the arc weight (ω satisfies any weight).
    pub fn is_enabled(&self, transition: &str, marking: &Marking) -> bool {
        self.transition_id(transition)
            .is_some_and(|id| self.is_transition_enabled(id, marking))
    }

    pub fn is_transition_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        if transition.index() >= self.transitions_len() || marking.len() != self.places_len() {
            return false;
        }
        self.consumes(transition)
            .all(|(place, weight)| marking.tokens(place).satisfies(weight))
    }

    /// Enabled transitions in definition order.
    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        let enabled: Vec<_> = self
            .transitions
            .indices()
            .filter(|&transition| self.is_transition_enabled(transition, marking))
            .collect();
        log::trace!("enabled under {marking}: {enabled:?}");
        enabled
    }

    /// Names of [`enabled_transitions`](Self::enabled_transitions).
    pub fn enabled_transition_names(&self, marking: &Marking) -> Vec<&str> {
        self.enabled_transitions(marking)
            .into_iter()
            .map(|transition| self.transition_name(transition))
            .collect()
    }

    pub fn fire(&self, transition: &str, marking: &Marking) -> Result<Marking, FireError> {
        let id = self
            .transition_id(transition)
            .ok_or_else(|| FireError::UnknownTransition(transition.to_string()))?;
        self.fire_transition(id, marking)
    }

    /// Subtracts input weights, then adds output weights, in ω-arithmetic.
    pub fn fire_transition(
        &self,
        transition: TransitionId,
        marking: &Marking,
    ) -> Result<Marking, FireError> {
        let Some(name) = self.transitions.get(transition).map(|t| t.name.as_str()) else {
            return Err(FireError::UnknownTransition(format!("{transition:?}")));
        };
        if marking.len() != self.places_len() {
            return Err(FireError::LengthMismatch {
                expected: self.places_len(),
                found: marking.len(),
            });
        }
        if !self.is_transition_enabled(transition, marking) {
            return Err(FireError::NotEnabled(name.to_string()));
        }

        let mut next = marking.clone();
        for (place, weight) in self.consumes(transition) {
            let tokens = next.tokens_mut(place);
            *tokens = tokens
                .checked_sub(weight)
                .ok_or_else(|| FireError::NotEnabled(name.to_string()))?;
        }
        for (place, weight) in self.produces(transition) {
            let tokens = next.tokens_mut(place);
            *tokens = tokens.checked_add(weight).ok_or_else(|| FireError::Overflow {
                place: self.place_name(place).to_string(),
                transition: name.to_string(),
            })?;
        }
        Ok(next)
    }
}
