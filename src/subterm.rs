//! Positions of subterms in rule left-hand sides.

use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Position of a subterm in a rule's left-hand side.
///
/// A position is a path of sibling indices from the root.
/// The root position [`init`] is occupied by the head symbol;
/// the arguments of the left-hand side are its successors.
/// Positions are totally ordered, so that they can serve as map keys.
///
/// [`init`]: Self::init
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Subterm(Vec<usize>);

impl Subterm {
    /// Position of the root.
    pub fn init() -> Self {
        Self(Vec::from([0]))
    }

    /// Position of the next sibling.
    pub fn succ(&self) -> Self {
        let mut path = self.0.clone();
        // the path is never empty
        *path.last_mut().unwrap() += 1;
        Self(path)
    }

    /// Position of the first child.
    pub fn sub(&self) -> Self {
        let mut path = self.0.clone();
        path.push(0);
        Self(path)
    }

    /// Re-root a position, prepending `self` to its path.
    pub fn prefix(&self, q: &Self) -> Self {
        let mut path = self.0.clone();
        path.extend_from_slice(&q.0);
        Self(path)
    }

    /// Assign sibling positions to a sequence, starting at `self`.
    pub fn tag<T, I>(self, iter: I) -> Vec<(T, Subterm)>
    where
        I: IntoIterator<Item = T>,
    {
        let mut pos = self;
        let mut out = Vec::new();
        for x in iter {
            let next = pos.succ();
            out.push((x, pos));
            pos = next;
        }
        out
    }
}

impl Display for Subterm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut path = self.0.iter();
        path.next().iter().try_for_each(|p| p.fmt(f))?;
        path.try_for_each(|p| write!(f, ".{}", p))
    }
}
