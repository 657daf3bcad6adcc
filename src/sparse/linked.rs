//! Linked sparse stores
//!
//! Per-row ([`LinkedRowStore`]) or per-column ([`LinkedColumnStore`])
//! doubly-linked node lists instead of compact arrays: locality is traded
//! for O(1) single-element insertion and removal without shifting.
//!
//! Nodes live in an arena and are addressed by stable `u32` handles with a
//! free list, so removal never leaves a dangling link. Each list is strictly
//! increasing by orthogonal-axis index. The search direction for a lookup is
//! chosen by comparing the target index against the precomputed midpoint of
//! the orthogonal dimension: before the midpoint, walk forward from the
//! head; otherwise walk backward from the tail.
//!
//! Any mutation that leaves a node's value within the shared zero tolerance
//! unlinks the node and returns it to the free list.

use super::csc::CscStore;
use super::csr::CsrStore;
use super::SparseStructure;
use crate::scalar::{Scalar, ZERO_TOLERANCE};
use crate::store::{Access, Mutate, Nonzeros, Structure};

const NIL: u32 = u32::MAX;

#[derive(Debug, Clone)]
struct Node<T> {
    index: usize,
    value: T,
    prev: u32,
    next: u32,
}

/// Shared core: `lists` doubly-linked lists over an orthogonal dimension of
/// length `span`, nodes arena-allocated and handle-addressed
#[derive(Debug, Clone)]
struct LinkedLists<T> {
    span: usize,
    midpoint: usize,
    nodes: Vec<Node<T>>,
    free: Vec<u32>,
    head: Vec<u32>,
    tail: Vec<u32>,
    nnz: usize,
}

impl<T: Scalar> LinkedLists<T> {
    fn new(lists: usize, span: usize) -> Self {
        Self {
            span,
            midpoint: span / 2,
            nodes: Vec::new(),
            free: Vec::new(),
            head: vec![NIL; lists],
            tail: vec![NIL; lists],
            nnz: 0,
        }
    }

    fn allocate(&mut self, index: usize, value: T) -> u32 {
        self.nnz += 1;
        if let Some(handle) = self.free.pop() {
            self.nodes[handle as usize] = Node {
                index,
                value,
                prev: NIL,
                next: NIL,
            };
            handle
        } else {
            self.nodes.push(Node {
                index,
                value,
                prev: NIL,
                next: NIL,
            });
            (self.nodes.len() - 1) as u32
        }
    }

    /// Locate the node at `index`, walking from whichever end the midpoint
    /// heuristic picks
    fn find(&self, list: usize, index: usize) -> Option<u32> {
        if index < self.midpoint {
            let mut cur = self.head[list];
            while cur != NIL {
                let node = &self.nodes[cur as usize];
                if node.index == index {
                    return Some(cur);
                }
                if node.index > index {
                    return None;
                }
                cur = node.next;
            }
        } else {
            let mut cur = self.tail[list];
            while cur != NIL {
                let node = &self.nodes[cur as usize];
                if node.index == index {
                    return Some(cur);
                }
                if node.index < index {
                    return None;
                }
                cur = node.prev;
            }
        }
        None
    }

    fn get(&self, list: usize, index: usize) -> T {
        debug_assert!(index < self.span);
        self.find(list, index)
            .map_or(T::ZERO, |h| self.nodes[h as usize].value)
    }

    /// The node at `index`, linking in a new zero-valued node when absent
    ///
    /// The insertion point comes from the same bidirectional search as
    /// [`LinkedLists::find`].
    fn node_at(&mut self, list: usize, index: usize) -> u32 {
        debug_assert!(index < self.span);
        if index < self.midpoint {
            let mut cur = self.head[list];
            while cur != NIL {
                let node = &self.nodes[cur as usize];
                if node.index == index {
                    return cur;
                }
                if node.index > index {
                    return self.link_before(list, cur, index);
                }
                cur = node.next;
            }
            self.link_last(list, index)
        } else {
            let mut cur = self.tail[list];
            while cur != NIL {
                let node = &self.nodes[cur as usize];
                if node.index == index {
                    return cur;
                }
                if node.index < index {
                    return self.link_after(list, cur, index);
                }
                cur = node.prev;
            }
            self.link_first(list, index)
        }
    }

    fn link_before(&mut self, list: usize, successor: u32, index: usize) -> u32 {
        let handle = self.allocate(index, T::ZERO);
        let predecessor = self.nodes[successor as usize].prev;
        self.nodes[handle as usize].prev = predecessor;
        self.nodes[handle as usize].next = successor;
        self.nodes[successor as usize].prev = handle;
        if predecessor == NIL {
            self.head[list] = handle;
        } else {
            self.nodes[predecessor as usize].next = handle;
        }
        handle
    }

    fn link_after(&mut self, list: usize, predecessor: u32, index: usize) -> u32 {
        let handle = self.allocate(index, T::ZERO);
        let successor = self.nodes[predecessor as usize].next;
        self.nodes[handle as usize].prev = predecessor;
        self.nodes[handle as usize].next = successor;
        self.nodes[predecessor as usize].next = handle;
        if successor == NIL {
            self.tail[list] = handle;
        } else {
            self.nodes[successor as usize].prev = handle;
        }
        handle
    }

    fn link_first(&mut self, list: usize, index: usize) -> u32 {
        let handle = self.allocate(index, T::ZERO);
        let old = self.head[list];
        self.nodes[handle as usize].next = old;
        self.head[list] = handle;
        if old == NIL {
            self.tail[list] = handle;
        } else {
            self.nodes[old as usize].prev = handle;
        }
        handle
    }

    fn link_last(&mut self, list: usize, index: usize) -> u32 {
        let handle = self.allocate(index, T::ZERO);
        let old = self.tail[list];
        self.nodes[handle as usize].prev = old;
        self.tail[list] = handle;
        if old == NIL {
            self.head[list] = handle;
        } else {
            self.nodes[old as usize].next = handle;
        }
        handle
    }

    fn unlink(&mut self, list: usize, handle: u32) {
        let (prev, next) = {
            let node = &self.nodes[handle as usize];
            (node.prev, node.next)
        };
        if prev == NIL {
            self.head[list] = next;
        } else {
            self.nodes[prev as usize].next = next;
        }
        if next == NIL {
            self.tail[list] = prev;
        } else {
            self.nodes[next as usize].prev = prev;
        }
        self.nodes[handle as usize].value = T::ZERO;
        self.free.push(handle);
        self.nnz -= 1;
    }

    fn remove_if_zero(&mut self, list: usize, handle: u32) {
        if self.nodes[handle as usize].value.is_small(ZERO_TOLERANCE) {
            self.unlink(list, handle);
        }
    }

    fn set(&mut self, list: usize, index: usize, value: T) {
        if value.is_small(ZERO_TOLERANCE) {
            if let Some(handle) = self.find(list, index) {
                self.unlink(list, handle);
            }
        } else {
            let handle = self.node_at(list, index);
            self.nodes[handle as usize].value = value;
        }
    }

    fn add(&mut self, list: usize, index: usize, value: T) {
        if value == T::ZERO {
            return;
        }
        let handle = self.node_at(list, index);
        self.nodes[handle as usize].value += value;
        self.remove_if_zero(list, handle);
    }

    /// Apply `f` to every stored value of one list, evicting results that
    /// collapse to zero
    fn modify_list<F: Fn(T) -> T>(&mut self, list: usize, f: &F) {
        let mut cur = self.head[list];
        while cur != NIL {
            let next = self.nodes[cur as usize].next;
            let value = f(self.nodes[cur as usize].value);
            self.nodes[cur as usize].value = value;
            self.remove_if_zero(list, cur);
            cur = next;
        }
    }

    /// Swap two whole lists: O(1) anchor exchange
    fn exchange_lists(&mut self, a: usize, b: usize) {
        self.head.swap(a, b);
        self.tail.swap(a, b);
    }

    /// Swap the values at two orthogonal indices across every list
    ///
    /// This is the addressed-axis exchange: it must walk and swap per-node
    /// values, with zero eviction afterward.
    fn exchange_within(&mut self, index_a: usize, index_b: usize) {
        if index_a == index_b {
            return;
        }
        for list in 0..self.head.len() {
            let va = self.get(list, index_a);
            let vb = self.get(list, index_b);
            self.set(list, index_a, vb);
            self.set(list, index_b, va);
        }
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head.fill(NIL);
        self.tail.fill(NIL);
        self.nnz = 0;
    }

    fn list_entries(&self, list: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let mut cur = self.head[list];
        std::iter::from_fn(move || {
            if cur == NIL {
                None
            } else {
                let node = &self.nodes[cur as usize];
                cur = node.next;
                Some((node.index, node.value))
            }
        })
    }

    fn memory_usage(&self) -> usize {
        self.nodes.len() * std::mem::size_of::<Node<T>>()
            + self.free.len() * std::mem::size_of::<u32>()
            + (self.head.len() + self.tail.len()) * std::mem::size_of::<u32>()
    }
}

/// Sparse store with one doubly-linked node list per row
#[derive(Debug, Clone)]
pub struct LinkedRowStore<T> {
    rows: usize,
    cols: usize,
    lists: LinkedLists<T>,
}

impl<T: Scalar> LinkedRowStore<T> {
    /// Create an empty store
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            lists: LinkedLists::new(rows, cols),
        }
    }

    /// Swap two rows: O(1) exchange of the list anchors
    pub fn exchange_rows(&mut self, row_a: usize, row_b: usize) {
        self.lists.exchange_lists(row_a, row_b);
    }

    /// Swap two columns: walks every row list and swaps the per-node values,
    /// evicting any that end up zero
    pub fn exchange_columns(&mut self, col_a: usize, col_b: usize) {
        self.lists.exchange_within(col_a, col_b);
    }

    /// Apply `f` to every stored value of one row
    pub fn modify_row<F: Fn(T) -> T>(&mut self, row: usize, f: F) {
        self.lists.modify_list(row, &f);
    }

    /// Apply `f` to every stored value
    pub fn modify_all<F: Fn(T) -> T>(&mut self, f: F) {
        for row in 0..self.rows {
            self.lists.modify_list(row, &f);
        }
    }

    /// Convert to CSR; the row-list walk visits columns in sorted order
    pub fn to_csr(&self) -> CsrStore<T> {
        let mut row_pointers = vec![0usize; self.rows + 1];
        let mut col_indices = Vec::with_capacity(self.lists.nnz);
        let mut values = Vec::with_capacity(self.lists.nnz);
        for row in 0..self.rows {
            for (col, value) in self.lists.list_entries(row) {
                col_indices.push(col);
                values.push(value);
            }
            row_pointers[row + 1] = values.len();
        }
        CsrStore::from_parts_unchecked(self.rows, self.cols, row_pointers, col_indices, values)
    }

    /// Build from a CSR store
    pub fn from_csr(source: &CsrStore<T>) -> Self {
        let mut store = Self::new(source.rows(), source.cols());
        for (r, c, v) in source.nonzeros() {
            store.lists.set(r, c, v);
        }
        store
    }
}

impl<T> Structure for LinkedRowStore<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

impl<T: Scalar> SparseStructure for LinkedRowStore<T> {
    fn nnz(&self) -> usize {
        self.lists.nnz
    }

    fn memory_usage(&self) -> usize {
        self.lists.memory_usage()
    }
}

impl<T: Scalar> Access<T> for LinkedRowStore<T> {
    fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.rows && col < self.cols);
        self.lists.get(row, col)
    }

    /// Row-major walk of the lists
    fn nonzeros(&self) -> Nonzeros<'_, T> {
        Box::new((0..self.rows).flat_map(move |r| {
            self.lists.list_entries(r).map(move |(c, v)| (r, c, v))
        }))
    }
}

impl<T: Scalar> Mutate<T> for LinkedRowStore<T> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.lists.set(row, col, value);
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.lists.add(row, col, value);
    }

    fn reset(&mut self) {
        self.lists.reset();
    }
}

/// Sparse store with one doubly-linked node list per column
#[derive(Debug, Clone)]
pub struct LinkedColumnStore<T> {
    rows: usize,
    cols: usize,
    lists: LinkedLists<T>,
}

impl<T: Scalar> LinkedColumnStore<T> {
    /// Create an empty store
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            lists: LinkedLists::new(cols, rows),
        }
    }

    /// Swap two columns: O(1) exchange of the list anchors
    pub fn exchange_columns(&mut self, col_a: usize, col_b: usize) {
        self.lists.exchange_lists(col_a, col_b);
    }

    /// Swap two rows: walks every column list and swaps the per-node values,
    /// evicting any that end up zero
    pub fn exchange_rows(&mut self, row_a: usize, row_b: usize) {
        self.lists.exchange_within(row_a, row_b);
    }

    /// Apply `f` to every stored value of one column
    pub fn modify_column<F: Fn(T) -> T>(&mut self, col: usize, f: F) {
        self.lists.modify_list(col, &f);
    }

    /// Apply `f` to every stored value
    pub fn modify_all<F: Fn(T) -> T>(&mut self, f: F) {
        for col in 0..self.cols {
            self.lists.modify_list(col, &f);
        }
    }

    /// Convert to CSC; the column-list walk visits rows in sorted order
    pub fn to_csc(&self) -> CscStore<T> {
        let mut col_pointers = vec![0usize; self.cols + 1];
        let mut row_indices = Vec::with_capacity(self.lists.nnz);
        let mut values = Vec::with_capacity(self.lists.nnz);
        for col in 0..self.cols {
            for (row, value) in self.lists.list_entries(col) {
                row_indices.push(row);
                values.push(value);
            }
            col_pointers[col + 1] = values.len();
        }
        CscStore::from_parts_unchecked(self.rows, self.cols, col_pointers, row_indices, values)
    }

    /// Build from a CSC store
    pub fn from_csc(source: &CscStore<T>) -> Self {
        let mut store = Self::new(source.rows(), source.cols());
        for (r, c, v) in source.nonzeros() {
            store.lists.set(c, r, v);
        }
        store
    }
}

impl<T> Structure for LinkedColumnStore<T> {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

impl<T: Scalar> SparseStructure for LinkedColumnStore<T> {
    fn nnz(&self) -> usize {
        self.lists.nnz
    }

    fn memory_usage(&self) -> usize {
        self.lists.memory_usage()
    }
}

impl<T: Scalar> Access<T> for LinkedColumnStore<T> {
    fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.rows && col < self.cols);
        self.lists.get(col, row)
    }

    /// Column-major walk of the lists
    fn nonzeros(&self) -> Nonzeros<'_, T> {
        Box::new((0..self.cols).flat_map(move |c| {
            self.lists.list_entries(c).map(move |(r, v)| (r, c, v))
        }))
    }
}

impl<T: Scalar> Mutate<T> for LinkedColumnStore<T> {
    fn set(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.lists.set(col, row, value);
    }

    fn add(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.rows && col < self.cols);
        self.lists.add(col, row, value);
    }

    fn reset(&mut self) {
        self.lists.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_both_search_directions() {
        let mut a = LinkedRowStore::<f64>::new(2, 10);
        a.set(0, 1, 1.0); // before the midpoint: forward search
        a.set(0, 8, 2.0); // after the midpoint: backward search
        a.set(0, 5, 3.0);
        assert_eq!(a.get(0, 1), 1.0);
        assert_eq!(a.get(0, 8), 2.0);
        assert_eq!(a.get(0, 5), 3.0);
        assert_eq!(a.get(0, 0), 0.0);
        assert_eq!(a.get(0, 9), 0.0);
        assert_eq!(a.nnz(), 3);
    }

    #[test]
    fn test_lists_stay_sorted() {
        let mut a = LinkedRowStore::<f64>::new(1, 12);
        for &c in &[7usize, 2, 9, 0, 11, 5] {
            a.set(0, c, (c + 1) as f64);
        }
        let cols: Vec<usize> = a.nonzeros().map(|(_, c, _)| c).collect();
        assert_eq!(cols, vec![0, 2, 5, 7, 9, 11]);
    }

    #[test]
    fn test_zero_eviction_on_add() {
        let mut a = LinkedRowStore::<f64>::new(1, 4);
        a.set(0, 2, 5.0);
        a.add(0, 2, -5.0);
        assert_eq!(a.nnz(), 0);
        assert_eq!(a.get(0, 2), 0.0);
        assert_eq!(a.nonzeros().count(), 0);
    }

    #[test]
    fn test_arena_reuses_freed_nodes() {
        let mut a = LinkedRowStore::<f64>::new(1, 8);
        a.set(0, 3, 1.0);
        a.set(0, 3, 0.0); // evicted, node handle freed
        a.set(0, 6, 2.0); // must reuse the freed slot
        assert_eq!(a.lists.nodes.len(), 1);
        assert_eq!(a.get(0, 6), 2.0);
    }

    #[test]
    fn test_exchange_rows_is_anchor_swap() {
        let mut a = LinkedRowStore::<f64>::new(2, 4);
        a.set(0, 1, 1.0);
        a.set(1, 2, 2.0);
        a.exchange_rows(0, 1);
        assert_eq!(a.get(0, 2), 2.0);
        assert_eq!(a.get(1, 1), 1.0);
        assert_eq!(a.get(0, 1), 0.0);
    }

    #[test]
    fn test_exchange_columns_walks_and_swaps() {
        let mut a = LinkedRowStore::<f64>::new(2, 4);
        a.set(0, 0, 1.0);
        a.set(1, 3, 2.0);
        a.exchange_columns(0, 3);
        assert_eq!(a.get(0, 3), 1.0);
        assert_eq!(a.get(0, 0), 0.0);
        assert_eq!(a.get(1, 0), 2.0);
        assert_eq!(a.get(1, 3), 0.0);
    }

    #[test]
    fn test_modify_all_evicts_zeros() {
        let mut a = LinkedRowStore::<f64>::new(2, 4);
        a.set(0, 1, 1.0);
        a.set(1, 2, 2.0);
        a.modify_all(|v| v - 1.0);
        assert_eq!(a.nnz(), 1);
        assert_eq!(a.get(1, 2), 1.0);
    }

    #[test]
    fn test_column_store_mirrors_row_store() {
        let mut a = LinkedColumnStore::<f64>::new(4, 2);
        a.set(3, 0, 1.0);
        a.set(0, 1, 2.0);
        assert_eq!(a.get(3, 0), 1.0);
        assert_eq!(a.get(0, 1), 2.0);

        a.exchange_columns(0, 1); // O(1) on the list axis
        assert_eq!(a.get(3, 1), 1.0);
        assert_eq!(a.get(0, 0), 2.0);

        a.exchange_rows(0, 3); // walks the lists
        assert_eq!(a.get(0, 1), 1.0);
        assert_eq!(a.get(3, 0), 2.0);
    }

    #[test]
    fn test_csr_round_trip() {
        let mut a = LinkedRowStore::<f64>::new(3, 3);
        a.set(0, 0, 1.0);
        a.set(0, 2, 2.0);
        a.set(2, 1, 3.0);

        let csr = a.to_csr();
        assert_eq!(csr.nnz(), 3);
        let back = LinkedRowStore::from_csr(&csr);
        let original: Vec<_> = a.nonzeros().collect();
        let returned: Vec<_> = back.nonzeros().collect();
        assert_eq!(original, returned);
    }

    #[test]
    fn test_csc_round_trip() {
        let mut a = LinkedColumnStore::<f64>::new(3, 2);
        a.set(2, 0, 4.0);
        a.set(1, 1, 5.0);

        let csc = a.to_csc();
        assert_eq!(csc.get(2, 0), 4.0);
        let back = LinkedColumnStore::from_csc(&csc);
        assert_eq!(back.get(2, 0), 4.0);
        assert_eq!(back.get(1, 1), 5.0);
        assert_eq!(back.nnz(), 2);
    }
}
