//! Congestion index: a lazy multiplicative segment tree over edge ids.
//!
//! Supports `range_multiply` over an inclusive edge-id interval and
//! `point_query` for a single edge, both O(log E). Point queries carry an
//! accumulator down the tree instead of pushing lazy factors, so reads
//! never mutate the tree. Route computations can therefore share the index
//! behind a read lock while updates take the write lock.

use crate::error::{Error, Result};

pub struct CongestionIndex {
    len: usize,
    values: Vec<f32>,
    lazy: Vec<f32>,
}

impl CongestionIndex {
    /// Index of size `len` with every factor at 1.0. The tree is 1-indexed
    /// over a 4x array, the usual complete-binary-tree layout.
    pub fn new(len: usize) -> Self {
        let slots = if len == 0 { 0 } else { len * 4 };
        Self {
            len,
            values: vec![1.0; slots],
            lazy: vec![1.0; slots],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Multiply `factor` into every cell of the inclusive range [l, r].
    pub fn range_multiply(&mut self, l: usize, r: usize, factor: f32) -> Result<()> {
        if self.len == 0 {
            return Err(Error::OutOfRange(
                "range_multiply called on an empty index".to_string(),
            ));
        }
        if l > r {
            return Err(Error::InvalidRange(format!(
                "range start {l} is greater than range end {r}"
            )));
        }
        if r >= self.len {
            return Err(Error::OutOfRange(format!(
                "range end {r} exceeds index size {}",
                self.len
            )));
        }

        self.multiply_in(1, 0, self.len - 1, l, r, factor);
        Ok(())
    }

    /// Current factor of the cell at `idx`.
    pub fn point_query(&self, idx: usize) -> Result<f32> {
        if idx >= self.len {
            return Err(Error::OutOfRange(format!(
                "index {idx} exceeds index size {}",
                self.len
            )));
        }
        Ok(self.query_in(1, 0, self.len - 1, idx, 1.0))
    }

    fn multiply_in(
        &mut self,
        node: usize,
        node_l: usize,
        node_r: usize,
        ql: usize,
        qr: usize,
        factor: f32,
    ) {
        if ql <= node_l && node_r <= qr {
            self.apply(node, factor, node_l == node_r);
            return;
        }

        self.push(node, node_l, node_r);

        let mid = node_l + (node_r - node_l) / 2;
        let left = node * 2;
        let right = left + 1;

        if ql <= mid {
            self.multiply_in(left, node_l, mid, ql, qr.min(mid), factor);
        }
        if qr > mid {
            self.multiply_in(right, mid + 1, node_r, ql.max(mid + 1), qr, factor);
        }

        self.values[node] = self.values[left] * self.values[right];
    }

    /// Read-only descent: pending factors are folded into `accumulated`
    /// instead of being pushed down.
    fn query_in(
        &self,
        node: usize,
        node_l: usize,
        node_r: usize,
        idx: usize,
        accumulated: f32,
    ) -> f32 {
        let accumulated = accumulated * self.lazy[node];

        if node_l == node_r {
            return self.values[node] * accumulated;
        }

        let mid = node_l + (node_r - node_l) / 2;
        let left = node * 2;

        if idx <= mid {
            self.query_in(left, node_l, mid, idx, accumulated)
        } else {
            self.query_in(left + 1, mid + 1, node_r, idx, accumulated)
        }
    }

    fn apply(&mut self, node: usize, factor: f32, is_leaf: bool) {
        self.values[node] *= factor;
        if !is_leaf {
            self.lazy[node] *= factor;
        }
    }

    fn push(&mut self, node: usize, node_l: usize, node_r: usize) {
        if node_l == node_r {
            return;
        }

        let factor = self.lazy[node];
        if factor == 1.0 {
            return;
        }

        let mid = node_l + (node_r - node_l) / 2;
        let left = node * 2;
        self.apply(left, factor, node_l == mid);
        self.apply(left + 1, factor, mid + 1 == node_r);
        self.lazy[node] = 1.0;
    }
}
