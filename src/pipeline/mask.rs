//! Redundancy mask for a symmetric matrix
//!
//! Marks the upper triangle and the diagonal, the half of a correlation
//! matrix that repeats the lower half or holds self-correlations.

use serde::{Serialize, Serializer};

/// Square boolean matrix, `true` where an entry should be hidden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    dim: usize,
    cells: Vec<bool>,
}

impl Mask {
    /// Mask of side `n` with `(i, j)` set iff `j >= i`.
    pub fn upper_triangle(n: usize) -> Self {
        let cells = (0..n)
            .flat_map(|i| (0..n).map(move |j| j >= i))
            .collect();
        Self { dim: n, cells }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Whether entry `(i, j)` is masked.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> bool {
        assert!(i < self.dim && j < self.dim, "mask index ({i}, {j}) out of range");
        self.cells[i * self.dim + j]
    }

    /// Row-major copy of the mask.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        if self.dim == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.dim).map(<[bool]>::to_vec).collect()
    }

    /// Number of entries left visible.
    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|&&hidden| !hidden).count()
    }
}

impl Serialize for Mask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}
