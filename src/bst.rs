use std::cmp::{max, Ordering};
use std::fmt::Write;

use itertools::Itertools;

use crate::error::KeyError;
use crate::node::{NodeIdx, NodePool};

/// Plain binary search tree over a node arena: search, ordered traversal and
/// link bookkeeping. It never restructures itself; the balancing tree on top
/// of it does all inserting, removing and rotating.
pub struct BinarySearchTree<K, V> {
    pub(crate) pool: NodePool<K, V>,
    pub(crate) root: Option<NodeIdx>,
}

impl<K, V> BinarySearchTree<K, V> {
    pub fn new() -> Self {
        BinarySearchTree {
            pool: NodePool::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.root = None;
    }

    /// Stored height of the root, 0 when empty.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    pub(crate) fn height_of(&self, idx: Option<NodeIdx>) -> usize {
        idx.map_or(0, |i| self.pool[i].height)
    }

    pub(crate) fn update_height(&mut self, idx: NodeIdx) {
        let lh = self.height_of(self.pool[idx].left);
        let rh = self.height_of(self.pool[idx].right);
        self.pool[idx].height = max(lh, rh) + 1;
    }

    /// Makes `child` the left child of `idx` and points it back at `idx`.
    pub(crate) fn set_left(&mut self, idx: NodeIdx, child: Option<NodeIdx>) {
        self.pool[idx].left = child;
        if let Some(c) = child {
            self.pool[c].parent = Some(idx);
        }
    }

    pub(crate) fn set_right(&mut self, idx: NodeIdx, child: Option<NodeIdx>) {
        self.pool[idx].right = child;
        if let Some(c) = child {
            self.pool[c].parent = Some(idx);
        }
    }

    pub(crate) fn set_root(&mut self, root: Option<NodeIdx>) {
        self.root = root;
        if let Some(r) = root {
            self.pool[r].parent = None;
        }
    }

    fn leftmost(&self, mut idx: NodeIdx) -> NodeIdx {
        while let Some(l) = self.pool[idx].left {
            idx = l;
        }
        idx
    }

    fn rightmost(&self, mut idx: NodeIdx) -> NodeIdx {
        while let Some(r) = self.pool[idx].right {
            idx = r;
        }
        idx
    }

    pub(crate) fn smallest(&self) -> Option<NodeIdx> {
        self.root.map(|r| self.leftmost(r))
    }

    pub(crate) fn largest(&self) -> Option<NodeIdx> {
        self.root.map(|r| self.rightmost(r))
    }

    /// Node holding the next smaller key, or `None` if `idx` holds the smallest.
    pub(crate) fn predecessor(&self, idx: NodeIdx) -> Option<NodeIdx> {
        if let Some(l) = self.pool[idx].left {
            return Some(self.rightmost(l));
        }
        let mut child = idx;
        let mut parent = self.pool[idx].parent;
        while let Some(p) = parent {
            if self.pool[p].right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.pool[p].parent;
        }
        None
    }

    /// Node holding the next larger key, or `None` if `idx` holds the largest.
    pub(crate) fn successor(&self, idx: NodeIdx) -> Option<NodeIdx> {
        if let Some(r) = self.pool[idx].right {
            return Some(self.leftmost(r));
        }
        let mut child = idx;
        let mut parent = self.pool[idx].parent;
        while let Some(p) = parent {
            if self.pool[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.pool[p].parent;
        }
        None
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.smallest().map(|i| (&self.pool[i].key, &self.pool[i].value))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.largest().map(|i| (&self.pool[i].key, &self.pool[i].value))
    }

    /// In-order iterator over `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            next: self.smallest(),
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Recomputes every subtree height from scratch (ignoring the stored
    /// attribute) and checks that siblings never differ by more than one.
    pub fn is_balanced(&self) -> bool {
        fn check<K, V>(idx: Option<NodeIdx>, pool: &NodePool<K, V>) -> Option<usize> {
            match idx {
                None => Some(0),
                Some(i) => {
                    let lh = check(pool[i].left, pool)?;
                    let rh = check(pool[i].right, pool)?;
                    (lh.abs_diff(rh) <= 1).then(|| max(lh, rh) + 1)
                }
            }
        }
        check(self.root, &self.pool).is_some()
    }
}

impl<K: Ord, V> BinarySearchTree<K, V> {
    /// Handle of the node holding `key`.
    pub(crate) fn internal_find(&self, key: &K) -> Option<NodeIdx> {
        let mut cur = self.root;
        while let Some(i) = cur {
            match key.cmp(&self.pool[i].key) {
                Ordering::Less => cur = self.pool[i].left,
                Ordering::Greater => cur = self.pool[i].right,
                Ordering::Equal => return Some(i),
            }
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.internal_find(key).map(|i| &self.pool[i].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.internal_find(key)?;
        Some(&mut self.pool[i].value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.internal_find(key).is_some()
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn find(&self, key: &K) -> Result<&V, KeyError> {
        self.get(key).ok_or(KeyError)
    }

    /// Panics if links, stored heights or key order are inconsistent, or if
    /// the arena holds nodes that are not reachable from the root.
    pub fn check_invariants(&self) {
        if let Some(r) = self.root {
            assert_eq!(self.pool[r].parent, None, "root {r} has a parent");
        }
        let mut reachable = 0;
        let mut stack: Vec<NodeIdx> = self.root.into_iter().collect();
        while let Some(i) = stack.pop() {
            reachable += 1;
            let node = &self.pool[i];
            for child in [node.left, node.right].into_iter().flatten() {
                assert!(self.pool.is_live(child), "node {i} links to freed node {child}");
                assert_eq!(
                    self.pool[child].parent,
                    Some(i),
                    "node {child} does not point back at its parent {i}"
                );
                stack.push(child);
            }
            let expected = max(self.height_of(node.left), self.height_of(node.right)) + 1;
            assert_eq!(
                node.height, expected,
                "node {i} stores height {} but its subtree has height {expected}",
                node.height
            );
        }
        assert_eq!(
            reachable,
            self.pool.len(),
            "{} live nodes but {reachable} reachable from the root",
            self.pool.len()
        );
        assert!(
            self.keys().tuple_windows().all(|(a, b)| a < b),
            "in-order keys are not strictly increasing"
        );
    }
}

impl<K: std::fmt::Display, V: std::fmt::Display> BinarySearchTree<K, V> {
    /// One `key: value` line per node in key order, indented two spaces per
    /// level of depth.
    pub fn to_pretty_string(&self) -> String {
        fn traverse<K: std::fmt::Display, V: std::fmt::Display>(
            idx: Option<NodeIdx>,
            level: usize,
            pool: &NodePool<K, V>,
            out: &mut String,
        ) {
            if let Some(i) = idx {
                traverse(pool[i].left, level + 1, pool, out);
                writeln!(
                    out,
                    "{}{}: {}",
                    "  ".repeat(level),
                    &pool[i].key,
                    &pool[i].value
                )
                .expect("writing to String cannot fail");
                traverse(pool[i].right, level + 1, pool, out);
            }
        }
        let mut out = String::new();
        traverse(self.root, 0, &self.pool, &mut out);
        out
    }
}

impl<K, V> Default for BinarySearchTree<K, V> {
    fn default() -> Self {
        BinarySearchTree::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for BinarySearchTree<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// In-order iterator that walks successor links instead of keeping a stack.
pub struct Iter<'a, K, V> {
    tree: &'a BinarySearchTree<K, V>,
    next: Option<NodeIdx>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        self.next = self.tree.successor(idx);
        self.remaining -= 1;
        let node = &self.tree.pool[idx];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a BinarySearchTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
