//! # Place/transition nets over ω-markings
//!
//! Let `P` be a finite, ordered set of places and `T` a set of transitions in
//! definition order. The input and output maps `Pre, Post ∈ ℕ^{|P|×|T|}` give
//! the arc weights (0 = no arc). Markings range over `(ℕ ∪ {ω})^{|P|}`:
//!
//! * `t` is **enabled** at `M` iff `∀p ∈ P: M[p] ≥ Pre[p, t]` (ω satisfies any weight);
//! * **firing** `t` yields `M'[p] = M[p] - Pre[p, t] + Post[p, t]` with `ω ± w = ω`.
//!
//! A [`Net`] is immutable and can only be obtained from a validated
//! [`NetDescription`].
//!
//! ## Example
//!
//! ```rust
//! use pn_cover::net::*;
//!
//! let net = NetDescription::new()
//!     .place("P0", 1)
//!     .place("P1", 0)
//!     .transition(TransitionDescription::new("t0").consumes("P0", 1).produces("P1", 1))
//!     .build()
//!     .unwrap();
//!
//! let marking = net.initial_marking();
//! assert_eq!(net.enabled_transition_names(&marking), vec!["t0"]);
//! let next = net.fire("t0", &marking).unwrap();
//! assert_eq!(next.to_string(), "[0, 1]");
//! ```

pub mod core;
pub mod description;
pub mod ids;
pub mod incidence;
pub mod index_vec;
pub mod io;
pub mod omega;
pub mod parse;
pub mod structure;

pub use self::core::{FireError, Net};
pub use description::{
    ArcSide, Arcs, NetDescription, TransitionDescription, ValidationError, ValidationIssue,
};
pub use ids::{NodeId, PlaceId, TransitionId};
pub use incidence::Incidence;
pub use index_vec::{Idx, IndexVec};
pub use omega::Tokens;
pub use structure::{Marking, MarkingComparison, Place, Transition, Weight};
