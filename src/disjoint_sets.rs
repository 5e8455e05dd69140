use std::fmt;

use crate::error::{Error, Result};

/// Weighted union-find over the elements `0..size`.
///
/// Each slot holds either the parent of that element (non-negative) or, for a set
/// representative, the negated size of its set.
#[derive(Debug, Clone)]
pub struct DisjointSets {
    slots: Vec<isize>,
}

impl DisjointSets {
    /// Creates `n` singleton sets `{0}, {1}, ..., {n - 1}`.
    pub fn new(n: usize) -> Self {
        DisjointSets {
            slots: vec![-1; n],
        }
    }

    fn check(&self, x: usize) -> Result<()> {
        if x < self.slots.len() {
            Ok(())
        } else {
            Err(Error::ElementOutOfRange {
                element: x,
                size: self.slots.len(),
            })
        }
    }

    /// Returns the representative of the set containing `x`.
    ///
    /// Every element on the path from `x` to its root is repointed directly at the root.
    pub fn find(&mut self, x: usize) -> Result<usize> {
        self.check(x)?;

        let mut root = x;
        while self.slots[root] >= 0 {
            root = self.slots[root] as usize;
        }

        // Second pass: compress the path
        let mut current = x;
        while current != root {
            let next = self.slots[current] as usize;
            self.slots[current] = root as isize;
            current = next;
        }
        Ok(root)
    }

    /// Joins the sets containing `x` and `y` by size.
    ///
    /// Returns `Some(size)` of the merged set, or `None` if both were already in the same set.
    /// On equal sizes the root of `y` is attached under the root of `x`.
    pub fn union(&mut self, x: usize, y: usize) -> Result<Option<usize>> {
        let root_x = self.find(x)?;
        let root_y = self.find(y)?;

        if root_x == root_y {
            return Ok(None);
        }

        // Sizes are stored negated, so the smaller slot value is the larger set
        let (larger, smaller) = if self.slots[root_y] < self.slots[root_x] {
            (root_y, root_x)
        } else {
            (root_x, root_y)
        };

        self.slots[larger] += self.slots[smaller];
        self.slots[smaller] = larger as isize;
        Ok(Some((-self.slots[larger]) as usize))
    }

    /// Number of disjoint sets currently in the structure.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|&&slot| slot < 0).count()
    }

    /// Number of elements, fixed at construction.
    pub fn size(&self) -> usize {
        self.slots.len()
    }
}

impl fmt::Display for DisjointSets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", slot)?;
        }
        write!(f, " }}")
    }
}
