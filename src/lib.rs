//! Karp-Miller coverability analysis for place/transition Petri nets.
//!
//! ```rust
//! use pn_cover::analysis::CoverabilityTree;
//! use pn_cover::net::{NetDescription, TransitionDescription};
//! use pn_cover::report;
//!
//! let net = NetDescription::new()
//!     .place("P0", 1)
//!     .transition(TransitionDescription::new("t1").consumes("P0", 1).produces("P0", 2))
//!     .build()
//!     .unwrap();
//! let tree = CoverabilityTree::build(&net).unwrap();
//! let properties = report::analyze(&tree);
//!
//! assert_eq!(tree.len(), 3);
//! assert!(!properties.is_bounded());
//! assert_eq!(properties.unbounded_places(), ["P0"]);
//! ```

pub mod analysis;
pub mod config;
pub mod net;
pub mod options;
pub mod report;
