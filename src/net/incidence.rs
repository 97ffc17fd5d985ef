//! Dense place×transition arc-weight matrix.
//!
//! One matrix holds the input (`Pre`, consumed) weights of a net and a second
//! one the output (`Post`, produced) weights. A zero entry means "no arc".
use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::Weight;

type SmallRow<T> = SmallVec<[T; 4]>;

#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Incidence<T> {
    rows: IndexVec<PlaceId, SmallRow<T>>,
    cols: usize,
}

impl<T> Incidence<T>
where
    T: Clone,
{
    pub fn new(places: usize, transitions: usize, default: T) -> Self {
        let rows = (0..places)
            .map(|_| SmallRow::from_elem(default.clone(), transitions))
            .collect();
        Self {
            rows,
            cols: transitions,
        }
    }

    pub fn places(&self) -> usize {
        self.rows.len()
    }

    pub fn transitions(&self) -> usize {
        self.cols
    }

    pub fn set(&mut self, place: PlaceId, transition: TransitionId, value: T) {
        self.rows[place][transition.index()] = value;
    }
}

impl Incidence<Weight> {
    /// Non-zero entries of one transition's column, in place order.
    pub fn column(&self, transition: TransitionId) -> impl Iterator<Item = (PlaceId, Weight)> + '_ {
        let col = transition.index();
        self.rows
            .iter_enumerated()
            .filter_map(move |(place, row)| match row[col] {
                0 => None,
                weight => Some((place, weight)),
            })
    }
}

impl<T: fmt::Debug> fmt::Debug for Incidence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for row in self.rows.iter() {
            list.entry(&row.as_slice());
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_skips_absent_arcs() {
        let mut pre = Incidence::new(3, 2, 0u64);
        let t1 = TransitionId::new(1);
        pre.set(PlaceId::new(0), t1, 2);
        pre.set(PlaceId::new(2), t1, 1);
        pre.set(PlaceId::new(2), t1, 2);

        let column: Vec<_> = pre.column(t1).collect();
        assert_eq!(column, vec![(PlaceId::new(0), 2), (PlaceId::new(2), 2)]);
        assert_eq!(pre.column(TransitionId::new(0)).count(), 0);
        assert_eq!((pre.places(), pre.transitions()), (3, 2));
    }
}
