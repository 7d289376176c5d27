use std::ops::{Index, IndexMut};

/// Handle of a node inside a [`NodePool`]. Stable for the node's lifetime.
pub type NodeIdx = usize;

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: usize,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) left: Option<NodeIdx>,
    pub(crate) right: Option<NodeIdx>,
}

/// Arena owning every node of a tree. Children are referenced by handle, so a
/// node "owns" its children only through the links the tree maintains; the
/// pool is what actually drops them.
#[derive(Debug)]
pub(crate) struct NodePool<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free_list: Vec<NodeIdx>,
}

impl<K, V> NodePool<K, V> {
    pub(crate) fn new() -> Self {
        NodePool {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, key: K, value: V) -> NodeIdx {
        let node = Node {
            key,
            value,
            height: 1,
            parent: None,
            left: None,
            right: None,
        };
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            let idx = self.slots.len();
            self.slots.push(Some(node));
            idx
        }
    }

    /// Drops the node at `idx` and returns its slot to the free list.
    pub(crate) fn free(&mut self, idx: NodeIdx) -> Node<K, V> {
        match self.slots.get_mut(idx).and_then(Option::take) {
            Some(node) => {
                self.free_list.push(idx);
                node
            }
            None => panic!("double free of node {idx}"),
        }
    }

    pub(crate) fn is_live(&self, idx: NodeIdx) -> bool {
        matches!(self.slots.get(idx), Some(Some(_)))
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    /// Exchanges key, value and stored height of two nodes. Links stay put.
    pub(crate) fn swap_payload(&mut self, a: NodeIdx, b: NodeIdx) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (l, r) = self.slots.split_at_mut(hi);
        match (l[lo].as_mut(), r[0].as_mut()) {
            (Some(x), Some(y)) => {
                std::mem::swap(&mut x.key, &mut y.key);
                std::mem::swap(&mut x.value, &mut y.value);
                std::mem::swap(&mut x.height, &mut y.height);
            }
            _ => panic!("payload swap touches a freed node ({a}, {b})"),
        }
    }
}

impl<K, V> Index<NodeIdx> for NodePool<K, V> {
    type Output = Node<K, V>;

    fn index(&self, idx: NodeIdx) -> &Node<K, V> {
        match self.slots.get(idx) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {idx}"),
        }
    }
}

impl<K, V> IndexMut<NodeIdx> for NodePool<K, V> {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Node<K, V> {
        match self.slots.get_mut(idx) {
            Some(Some(node)) => node,
            _ => panic!("dangling node handle {idx}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slots_are_reused() {
        let mut pool = NodePool::new();
        let a = pool.alloc(1, "a");
        let b = pool.alloc(2, "b");
        assert_eq!(pool.len(), 2);
        let node = pool.free(a);
        assert_eq!((node.key, node.value), (1, "a"));
        assert!(!pool.is_live(a));
        assert_eq!(pool.len(), 1);
        let c = pool.alloc(3, "c");
        assert_eq!(c, a);
        assert_eq!(pool[c].key, 3);
        assert_eq!(pool[b].height, 1);
    }

    #[test]
    #[should_panic(expected = "double free of node 0")]
    fn double_free_panics() {
        let mut pool = NodePool::new();
        let a = pool.alloc(1, ());
        pool.free(a);
        pool.free(a);
    }

    #[test]
    #[should_panic(expected = "dangling node handle 0")]
    fn freed_handle_is_dangling() {
        let mut pool = NodePool::new();
        let a = pool.alloc(1, ());
        pool.free(a);
        let _ = pool[a].height;
    }

    #[test]
    fn swap_payload_keeps_links() {
        let mut pool = NodePool::new();
        let a = pool.alloc(10, "ten");
        let b = pool.alloc(5, "five");
        pool[a].left = Some(b);
        pool[b].parent = Some(a);
        pool[a].height = 2;
        pool.swap_payload(b, a);
        assert_eq!((pool[a].key, pool[a].value, pool[a].height), (5, "five", 1));
        assert_eq!((pool[b].key, pool[b].value, pool[b].height), (10, "ten", 2));
        assert_eq!(pool[a].left, Some(b));
        assert_eq!(pool[b].parent, Some(a));
    }
}
