use std::cell::RefCell;
use std::cmp::{max, Ordering};
use std::marker::PhantomData;

use crate::bst::{BinarySearchTree, Iter};
use crate::config::{debug, ConfigT, DefaultConfig};
use crate::error::KeyError;
use crate::node::NodeIdx;

/// Height-balanced search tree mapping unique keys to values.
///
/// Every node stores the height of its subtree. After any insert or remove,
/// sibling subtrees differ in height by at most one, so lookups, inserts and
/// removes all touch `O(log n)` nodes.
pub struct AvlTree<K, V, Config: ConfigT = DefaultConfig> {
    base: BinarySearchTree<K, V>,
    debug_writer: Option<RefCell<Box<dyn std::fmt::Write>>>,
    _config: PhantomData<Config>,
}

impl<K: Ord, V> AvlTree<K, V, DefaultConfig> {
    pub fn new() -> Self {
        AvlTree::new_with_config()
    }
}

impl<K: Ord, V, Config: ConfigT> AvlTree<K, V, Config> {
    pub fn new_with_config() -> Self {
        AvlTree {
            base: BinarySearchTree::new(),
            debug_writer: None,
            _config: PhantomData,
        }
    }

    /// Debug lines go to `writer` instead of `tracing`. Only written when
    /// `Config::DEBUG` is set.
    pub fn with_debug_writer<W: std::fmt::Write + 'static>(writer: W) -> Self {
        AvlTree {
            base: BinarySearchTree::new(),
            debug_writer: Some(RefCell::new(Box::new(writer))),
            _config: PhantomData,
        }
    }

    fn height_of(&self, idx: Option<NodeIdx>) -> usize {
        self.base.height_of(idx)
    }

    fn left(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.base.pool[idx].left
    }

    fn right(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.base.pool[idx].right
    }

    // Single rotation for a node whose left child's left subtree is too tall.
    fn rotate_left_left(&mut self, node: NodeIdx) -> NodeIdx {
        let top = self
            .left(node)
            .expect("left-left rotation at a node without a left child");
        let parent = self.base.pool[node].parent;
        self.base.set_left(node, self.right(top));
        self.base.set_right(top, Some(node));
        self.base.pool[top].parent = parent;

        self.base.update_height(node);
        let h = max(self.height_of(self.left(top)), self.base.pool[node].height) + 1;
        self.base.pool[top].height = h;

        debug!(
            self.debug_writer,
            "rotate left-left at {node}: {top} becomes subtree root"
        );
        top
    }

    fn rotate_right_right(&mut self, node: NodeIdx) -> NodeIdx {
        let top = self
            .right(node)
            .expect("right-right rotation at a node without a right child");
        let parent = self.base.pool[node].parent;
        self.base.set_right(node, self.left(top));
        self.base.set_left(top, Some(node));
        self.base.pool[top].parent = parent;

        self.base.update_height(node);
        let h = max(self.height_of(self.right(top)), self.base.pool[node].height) + 1;
        self.base.pool[top].height = h;

        debug!(
            self.debug_writer,
            "rotate right-right at {node}: {top} becomes subtree root"
        );
        top
    }

    fn rotate_left_right(&mut self, node: NodeIdx) -> NodeIdx {
        debug!(self.debug_writer, "rotate left-right at {node}");
        let left = self
            .left(node)
            .expect("left-right rotation at a node without a left child");
        let left = self.rotate_right_right(left);
        self.base.set_left(node, Some(left));
        self.rotate_left_left(node)
    }

    fn rotate_right_left(&mut self, node: NodeIdx) -> NodeIdx {
        debug!(self.debug_writer, "rotate right-left at {node}");
        let right = self
            .right(node)
            .expect("right-left rotation at a node without a right child");
        let right = self.rotate_left_left(right);
        self.base.set_right(node, Some(right));
        self.rotate_right_right(node)
    }

    /// Rotates if the left subtree of `node` is two taller than the right one,
    /// otherwise just refreshes its height. Returns the subtree's new root.
    fn fix_left_heavy(&mut self, node: NodeIdx) -> NodeIdx {
        let (l, r) = (self.left(node), self.right(node));
        if self.height_of(l) == self.height_of(r) + 2 {
            let l = l.expect("left subtree of height 2 is not empty");
            if self.height_of(self.right(l)) > self.height_of(self.left(l)) {
                self.rotate_left_right(node)
            } else {
                self.rotate_left_left(node)
            }
        } else {
            self.base.update_height(node);
            node
        }
    }

    fn fix_right_heavy(&mut self, node: NodeIdx) -> NodeIdx {
        let (l, r) = (self.left(node), self.right(node));
        if self.height_of(r) == self.height_of(l) + 2 {
            let r = r.expect("right subtree of height 2 is not empty");
            if self.height_of(self.left(r)) > self.height_of(self.right(r)) {
                self.rotate_right_left(node)
            } else {
                self.rotate_right_right(node)
            }
        } else {
            self.base.update_height(node);
            node
        }
    }

    fn insert_node(&mut self, idx: Option<NodeIdx>, key: K, value: V) -> NodeIdx {
        let Some(node) = idx else {
            let node = self.base.pool.alloc(key, value);
            debug!(self.debug_writer, "insert: new node {node}");
            return node;
        };
        match key.cmp(&self.base.pool[node].key) {
            Ordering::Less => {
                let child = self.insert_node(self.left(node), key, value);
                self.base.set_left(node, Some(child));
                self.fix_left_heavy(node)
            }
            Ordering::Greater => {
                let child = self.insert_node(self.right(node), key, value);
                self.base.set_right(node, Some(child));
                self.fix_right_heavy(node)
            }
            Ordering::Equal => {
                self.base.pool[node].value = value;
                debug!(self.debug_writer, "insert: overwrote value at node {node}");
                node
            }
        }
    }

    /// Inserts `key`, or overwrites its value if it is already present. An
    /// overwrite leaves the shape of the tree untouched.
    pub fn insert(&mut self, key: K, value: V) {
        let root = self.insert_node(self.base.root, key, value);
        self.base.set_root(Some(root));
        if Config::CHECK_INVARIANTS {
            self.check_invariants();
        }
    }

    // Frees `node` and hands its only child (if any) up to the caller.
    fn splice_out(&mut self, node: NodeIdx) -> Option<NodeIdx> {
        let child = self.left(node).or(self.right(node));
        self.base.pool.free(node);
        debug!(self.debug_writer, "remove: freed node {node}");
        child
    }

    fn remove_node(&mut self, idx: Option<NodeIdx>, key: &K) -> Option<NodeIdx> {
        let node = idx?;
        match key.cmp(&self.base.pool[node].key) {
            Ordering::Less => {
                let child = self.remove_node(self.left(node), key);
                self.base.set_left(node, child);
                Some(self.fix_right_heavy(node))
            }
            Ordering::Greater => {
                let child = self.remove_node(self.right(node), key);
                self.base.set_right(node, child);
                Some(self.fix_left_heavy(node))
            }
            Ordering::Equal => match (self.left(node), self.right(node)) {
                (Some(left), Some(_)) => {
                    let pred = self
                        .base
                        .predecessor(node)
                        .expect("a node with a left child has a predecessor");
                    // `key` now lives in the predecessor's slot, the rightmost
                    // of the left subtree, which has no right child. Descending
                    // for it again splices that slot out and rebalances the path.
                    self.base.pool.swap_payload(node, pred);
                    debug!(
                        self.debug_writer,
                        "remove: swapped payload of {node} with predecessor {pred}"
                    );
                    let child = self.remove_node(Some(left), key);
                    self.base.set_left(node, child);
                    Some(self.fix_right_heavy(node))
                }
                _ => self.splice_out(node),
            },
        }
    }

    /// Removes `key` if present; a missing key is a no-op.
    pub fn remove(&mut self, key: &K) {
        if self.base.internal_find(key).is_none() {
            return;
        }
        let root = self.remove_node(self.base.root, key);
        self.base.set_root(root);
        if Config::CHECK_INVARIANTS {
            self.check_invariants();
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.base.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.base.get_mut(key)
    }

    pub fn find(&self, key: &K) -> Result<&V, KeyError> {
        self.base.find(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.base.contains_key(key)
    }

    /// Panics unless every base-tree invariant holds and no two sibling
    /// subtrees differ in height by more than one.
    pub fn check_invariants(&self) {
        self.base.check_invariants();
        let mut stack: Vec<NodeIdx> = self.base.root.into_iter().collect();
        while let Some(i) = stack.pop() {
            let (l, r) = (self.left(i), self.right(i));
            let (lh, rh) = (self.height_of(l), self.height_of(r));
            assert!(
                lh.abs_diff(rh) <= 1,
                "node {i} is out of balance: left height {lh}, right height {rh}"
            );
            stack.extend(l.into_iter().chain(r));
        }
    }
}

impl<K, V, Config: ConfigT> AvlTree<K, V, Config> {
    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn clear(&mut self) {
        self.base.clear();
    }

    /// Stored height of the root; 0 for an empty tree, 1 for a single node.
    pub fn height(&self) -> usize {
        self.base.height()
    }

    pub fn is_balanced(&self) -> bool {
        self.base.is_balanced()
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.base.first_key_value()
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.base.last_key_value()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.base.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.base.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.base.values()
    }

    /// The underlying search tree, for read-only access.
    pub fn as_bst(&self) -> &BinarySearchTree<K, V> {
        &self.base
    }
}

impl<K: std::fmt::Display, V: std::fmt::Display, Config: ConfigT> AvlTree<K, V, Config> {
    pub fn to_pretty_string(&self) -> String {
        self.base.to_pretty_string()
    }
}

impl<K: Ord, V> Default for AvlTree<K, V, DefaultConfig> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug, Config: ConfigT> std::fmt::Debug
    for AvlTree<K, V, Config>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.base, f)
    }
}

impl<'a, K, V, Config: ConfigT> IntoIterator for &'a AvlTree<K, V, Config> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K: Ord, V, Config: ConfigT> Extend<(K, V)> for AvlTree<K, V, Config> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, Config: ConfigT> FromIterator<(K, V)> for AvlTree<K, V, Config> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = AvlTree::new_with_config();
        tree.extend(iter);
        tree
    }
}
