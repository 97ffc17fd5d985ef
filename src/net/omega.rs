//! Token counts extended with ω.
//!
//! `Tokens` is the value domain `ℕ ∪ {ω}` used by coverability markings:
//!
//! * `ω` is strictly greater than every finite count and equal only to itself;
//! * `ω + w = ω` and `ω - w = ω` for every finite weight `w`;
//! * a finite count only ever changes by finite amounts. `ω` is introduced by
//!   acceleration ([`Marking::accelerate`](crate::net::Marking::accelerate)),
//!   never by firing.
//!
//! The derived ordering matches that domain: `Finite(_)` sorts before `Omega`
//! and finite counts compare numerically.
use std::fmt;

use serde::{Serialize, Serializer};

use crate::net::structure::Weight;

/// Symbol used when a marking is displayed.
pub const OMEGA: &str = "ω";

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tokens {
    Finite(Weight),
    Omega,
}

impl Tokens {
    pub const ZERO: Tokens = Tokens::Finite(0);

    pub fn is_omega(self) -> bool {
        matches!(self, Tokens::Omega)
    }

    /// Whether at least `weight` tokens are available.
    pub fn satisfies(self, weight: Weight) -> bool {
        match self {
            Tokens::Finite(n) => n >= weight,
            Tokens::Omega => true,
        }
    }

    /// Removes `weight` tokens; `None` when a finite count would go negative.
    pub fn checked_sub(self, weight: Weight) -> Option<Tokens> {
        match self {
            Tokens::Finite(n) => n.checked_sub(weight).map(Tokens::Finite),
            Tokens::Omega => Some(Tokens::Omega),
        }
    }

    /// Adds `weight` tokens; `None` on `u64` overflow of a finite count.
    pub fn checked_add(self, weight: Weight) -> Option<Tokens> {
        match self {
            Tokens::Finite(n) => n.checked_add(weight).map(Tokens::Finite),
            Tokens::Omega => Some(Tokens::Omega),
        }
    }
}

impl Default for Tokens {
    fn default() -> Self {
        Tokens::ZERO
    }
}

impl From<Weight> for Tokens {
    fn from(value: Weight) -> Self {
        Tokens::Finite(value)
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tokens::Finite(n) => write!(f, "{n}"),
            Tokens::Omega => f.write_str(OMEGA),
        }
    }
}

/// Finite counts serialize as numbers, ω as the string `"ω"`.
impl Serialize for Tokens {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Tokens::Finite(n) => serializer.serialize_u64(*n),
            Tokens::Omega => serializer.serialize_str(OMEGA),
        }
    }
}
