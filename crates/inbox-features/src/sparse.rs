use serde::{Deserialize, Serialize};

/// Sparse feature vector: `(global index, value)` entries in feature order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    /// Total number of coordinates when the vector was assembled.
    pub dimension: usize,
    pub entries: Vec<(u32, f64)>,
}

impl SparseVector {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, index: u32, value: f64) {
        self.entries.push((index, value));
    }

    /// Value at a coordinate; duplicate entries are summed.
    pub fn get(&self, index: u32) -> f64 {
        self.entries
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, v)| v)
            .sum()
    }

    /// Number of stored entries, zero-valued ones included.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for &(i, v) in &self.entries {
            if let Some(slot) = dense.get_mut(i as usize) {
                *slot += v;
            }
        }
        dense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_sums_duplicates() {
        let mut v = SparseVector::new(4);
        v.push(1, 0.5);
        v.push(1, 0.25);
        v.push(3, 1.0);
        assert_eq!(v.to_dense(), vec![0.0, 0.75, 0.0, 1.0]);
        assert_eq!(v.get(1), 0.75);
        assert_eq!(v.nnz(), 3);
    }
}
