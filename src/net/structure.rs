//! Static net elements (places, transitions) and ω-markings.
use std::fmt;

use itertools::Itertools;
use serde::Serialize;

use crate::net::ids::PlaceId;
use crate::net::index_vec::IndexVec;
use crate::net::omega::Tokens;

pub type Weight = u64;

#[derive(Clone, Serialize, PartialEq, Eq, Hash, Debug)]
pub struct Place {
    pub name: String,
    pub tokens: Weight,
}

impl Place {
    pub fn new(name: impl Into<String>, tokens: Weight) -> Self {
        Self {
            name: name.into(),
            tokens,
        }
    }
}

/// Arc weights live in the net's incidence matrices; a transition only
/// carries its name.
#[derive(Clone, Serialize, PartialEq, Eq, Hash)]
pub struct Transition {
    pub name: String,
}

impl Transition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transition").field(&self.name).finish()
    }
}

/// Result of comparing two markings component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MarkingComparison {
    /// `m1[i] >= m2[i]` for every place.
    pub coverable: bool,
    /// Every component is identical.
    pub equal: bool,
    /// Some component of `m1` is strictly greater. Diagnostic only.
    pub dominates_somewhere: bool,
}

impl MarkingComparison {
    /// `m1` covers `m2` and differs from it: the acceleration trigger.
    pub fn strictly_covers(self) -> bool {
        self.coverable && !self.equal
    }
}

/// One [`Tokens`] value per place, indexed like the net's place sequence.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Marking(pub IndexVec<PlaceId, Tokens>);

impl Marking {
    pub fn new(tokens: IndexVec<PlaceId, Tokens>) -> Self {
        Self(tokens)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (PlaceId, &Tokens)> + '_ {
        self.0.iter_enumerated()
    }

    pub fn tokens(&self, place: PlaceId) -> Tokens {
        self.0[place]
    }

    pub fn tokens_mut(&mut self, place: PlaceId) -> &mut Tokens {
        &mut self.0[place]
    }

    pub fn has_omega(&self) -> bool {
        self.0.iter().any(|tokens| tokens.is_omega())
    }

    /// Places holding ω, in place order.
    pub fn omega_places(&self) -> impl Iterator<Item = PlaceId> + '_ {
        self.iter()
            .filter(|(_, tokens)| tokens.is_omega())
            .map(|(place, _)| place)
    }

    /// Component-wise comparison of `self` (m1) against `other` (m2).
    ///
    /// Both markings must belong to the same net.
    pub fn compare(&self, other: &Marking) -> MarkingComparison {
        debug_assert_eq!(self.len(), other.len());
        let mut result = MarkingComparison {
            coverable: true,
            equal: true,
            dominates_somewhere: false,
        };
        for (left, right) in self.0.iter().zip(other.0.iter()) {
            if left > right {
                result.dominates_somewhere = true;
                result.equal = false;
            } else if left < right {
                result.coverable = false;
                result.equal = false;
            }
        }
        result
    }

    /// Karp-Miller widening: every finite component strictly above the
    /// ancestor's finite component becomes ω. Existing ω entries stay ω.
    pub fn accelerate(&mut self, ancestor: &Marking) {
        debug_assert_eq!(self.len(), ancestor.len());
        for (place, limit) in ancestor.iter() {
            let current = self.tokens_mut(place);
            if let (Tokens::Finite(value), Tokens::Finite(bound)) = (*current, *limit) {
                if value > bound {
                    *current = Tokens::Omega;
                }
            }
        }
    }

    /// Renders `[1, ω, 0]` with a caller-chosen ω symbol.
    pub fn display_with(&self, omega: &str) -> String {
        let body = self
            .0
            .iter()
            .map(|tokens| match tokens {
                Tokens::Finite(n) => n.to_string(),
                Tokens::Omega => omega.to_string(),
            })
            .join(", ");
        format!("[{body}]")
    }
}

impl FromIterator<Tokens> for Marking {
    fn from_iter<I: IntoIterator<Item = Tokens>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Marking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

#[cfg(test)]
pub(crate) fn marking(values: &[Option<Weight>]) -> Marking {
    values
        .iter()
        .map(|value| value.map_or(Tokens::Omega, Tokens::Finite))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: Option<Weight> = None;

    #[test]
    fn compare_is_reflexive() {
        for m in [marking(&[Some(0), Some(3)]), marking(&[W, Some(1)]), marking(&[W, W])] {
            let cmp = m.compare(&m);
            assert!(cmp.coverable && cmp.equal && !cmp.dominates_somewhere);
        }
    }

    #[test]
    fn finite_never_covers_omega() {
        let cmp = marking(&[Some(100)]).compare(&marking(&[W]));
        assert!(!cmp.coverable);
        assert!(!cmp.equal);
    }

    #[test]
    fn omega_against_finite_is_not_equal() {
        let cmp = marking(&[W, Some(1)]).compare(&marking(&[Some(1), Some(1)]));
        assert!(cmp.coverable);
        assert!(!cmp.equal);
        assert!(cmp.dominates_somewhere);
        assert!(cmp.strictly_covers());
    }

    #[test]
    fn incomparable_markings() {
        let cmp = marking(&[Some(2), Some(0)]).compare(&marking(&[Some(1), Some(1)]));
        assert!(!cmp.coverable);
        assert!(cmp.dominates_somewhere);
    }

    #[test]
    fn accelerate_only_widens_strict_finite_growth() {
        let mut m = marking(&[Some(2), Some(1), W, Some(0)]);
        m.accelerate(&marking(&[Some(1), Some(1), Some(5), W]));
        assert_eq!(m, marking(&[W, Some(1), W, Some(0)]));
    }

    #[test]
    fn accelerate_is_idempotent() {
        let ancestor = marking(&[Some(1), Some(0), Some(4)]);
        let mut once = marking(&[Some(3), Some(0), Some(2)]);
        once.accelerate(&ancestor);
        let mut twice = once.clone();
        twice.accelerate(&ancestor);
        assert_eq!(once, twice);
    }

    #[test]
    fn display_uses_omega_symbol() {
        let m = marking(&[Some(1), W]);
        assert_eq!(m.to_string(), "[1, ω]");
        assert_eq!(m.display_with("w"), "[1, w]");
        assert_eq!(m.omega_places().collect::<Vec<_>>(), vec![PlaceId::new(1)]);
    }
}
