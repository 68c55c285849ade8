//! Columnar tables: ordered sequences of fixed-arity integer tuples.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Row ordering discipline, chosen per table at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableOrder {
    /// Rows stay in append order.
    Insertion,
    /// Rows are kept sorted lexicographically by the full tuple, enabling
    /// binary-searchable prefix range scans.
    Sorted,
}

/// An ordered sequence of fixed-width integer tuples, stored flat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    arity: usize,
    order: TableOrder,
    rows: Vec<u32>,
}

impl Table {
    pub fn new(name: &str, arity: usize, order: TableOrder) -> Self {
        assert!(arity > 0, "table arity must be positive");
        Self {
            name: name.to_string(),
            arity,
            order,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn order(&self) -> TableOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.rows.len() / self.arity
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. For a sorted table the row is inserted at its sort
    /// position; duplicate rows are kept.
    pub fn append(&mut self, row: &[u32]) {
        debug_assert_eq!(row.len(), self.arity, "row arity mismatch");
        match self.order {
            TableOrder::Insertion => self.rows.extend_from_slice(row),
            TableOrder::Sorted => {
                // Common case during indexing: rows arrive nearly in order,
                // so check the tail before binary searching.
                let n = self.len();
                if n == 0 || compare_rows(self.row(n - 1), row) != Ordering::Greater {
                    self.rows.extend_from_slice(row);
                    return;
                }
                let idx = self.partition_point(|existing| {
                    compare_rows(existing, row) != Ordering::Greater
                });
                let at = idx * self.arity;
                self.rows.splice(at..at, row.iter().copied());
            }
        }
    }

    pub fn row(&self, index: usize) -> &[u32] {
        let start = index * self.arity;
        &self.rows[start..start + self.arity]
    }

    /// Iterate all rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.rows.chunks_exact(self.arity)
    }

    /// Lazy scan of rows matching a predicate, in table order.
    pub fn scan<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a [u32]>
    where
        P: FnMut(&[u32]) -> bool + 'a,
    {
        self.iter().filter(move |row| predicate(row))
    }

    /// Index of the first row >= `prefix` under prefix comparison.
    ///
    /// Only meaningful for sorted tables: O(log n) seek, after which rows
    /// matching the prefix are contiguous.
    pub fn range_from(&self, prefix: &[u32]) -> usize {
        debug_assert!(prefix.len() <= self.arity);
        self.partition_point(|row| compare_rows(&row[..prefix.len()], prefix) == Ordering::Less)
    }

    /// Rows whose leading columns equal `prefix`, in table order. The
    /// yielded rows borrow only the table, so they may outlive a
    /// temporary prefix.
    pub fn prefix_rows<'a, 'p>(
        &'a self,
        prefix: &'p [u32],
    ) -> impl Iterator<Item = &'a [u32]> + use<'a, 'p> {
        let start = self.range_from(prefix);
        (start..self.len())
            .map(|i| self.row(i))
            .take_while(move |row| &row[..prefix.len()] == prefix)
    }

    fn partition_point<P>(&self, mut pred: P) -> usize
    where
        P: FnMut(&[u32]) -> bool,
    {
        let mut lo = 0;
        let mut hi = self.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(self.row(mid)) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Verify the sorted invariant. Used when validating a loaded store.
    pub(crate) fn is_well_ordered(&self) -> bool {
        match self.order {
            TableOrder::Insertion => true,
            TableOrder::Sorted => {
                let mut prev: Option<&[u32]> = None;
                for row in self.iter() {
                    if let Some(p) = prev {
                        if compare_rows(p, row) == Ordering::Greater {
                            return false;
                        }
                    }
                    prev = Some(row);
                }
                true
            }
        }
    }

    /// Check that the flat storage length is a whole number of rows.
    pub(crate) fn is_aligned(&self) -> bool {
        self.rows.len() % self.arity == 0
    }
}

fn compare_rows(a: &[u32], b: &[u32]) -> Ordering {
    a.cmp(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut t = Table::new("refs", 2, TableOrder::Insertion);
        t.append(&[3, 1]);
        t.append(&[1, 2]);
        t.append(&[2, 0]);
        let rows: Vec<&[u32]> = t.iter().collect();
        assert_eq!(rows, vec![&[3, 1][..], &[1, 2], &[2, 0]]);
    }

    #[test]
    fn test_sorted_insert() {
        let mut t = Table::new("refindex", 2, TableOrder::Sorted);
        t.append(&[3, 1]);
        t.append(&[1, 2]);
        t.append(&[2, 0]);
        t.append(&[1, 1]);
        let rows: Vec<&[u32]> = t.iter().collect();
        assert_eq!(rows, vec![&[1, 1][..], &[1, 2], &[2, 0], &[3, 1]]);
        assert!(t.is_well_ordered());
    }

    #[test]
    fn test_range_from_prefix() {
        let mut t = Table::new("t", 3, TableOrder::Sorted);
        t.append(&[1, 5, 0]);
        t.append(&[2, 1, 0]);
        t.append(&[2, 3, 0]);
        t.append(&[2, 3, 9]);
        t.append(&[4, 0, 0]);
        assert_eq!(t.range_from(&[2]), 1);
        assert_eq!(t.range_from(&[2, 3]), 2);
        assert_eq!(t.range_from(&[3]), 4);
        assert_eq!(t.range_from(&[9]), 5);
    }

    #[test]
    fn test_prefix_rows() {
        let mut t = Table::new("t", 2, TableOrder::Sorted);
        t.append(&[1, 1]);
        t.append(&[2, 1]);
        t.append(&[2, 2]);
        t.append(&[3, 1]);
        let matched: Vec<&[u32]> = t.prefix_rows(&[2]).collect();
        assert_eq!(matched, vec![&[2, 1][..], &[2, 2]]);
        assert_eq!(t.prefix_rows(&[5]).count(), 0);
    }

    #[test]
    fn test_prefix_rows_outlive_a_temporary_prefix() {
        let mut t = Table::new("t", 2, TableOrder::Sorted);
        t.append(&[2, 1]);
        t.append(&[2, 2]);
        // The prefix is a temporary that dies at the end of this
        // statement; the row must still borrow from the table alone.
        let row = t.prefix_rows(&[2]).next().unwrap();
        assert_eq!(row, &[2, 1]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let mut t = Table::new("t", 1, TableOrder::Insertion);
        for v in [1u32, 2, 3, 4] {
            t.append(&[v]);
        }
        let odd = |row: &[u32]| row[0] % 2 == 1;
        assert_eq!(t.scan(odd).count(), 2);
        // A second scan over the same table sees the same rows.
        assert_eq!(t.scan(odd).count(), 2);
    }

    #[test]
    fn test_duplicate_rows_kept() {
        let mut t = Table::new("t", 2, TableOrder::Sorted);
        t.append(&[1, 1]);
        t.append(&[1, 1]);
        assert_eq!(t.len(), 2);
    }
}
