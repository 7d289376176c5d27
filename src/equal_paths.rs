/// A node of an arbitrary (not necessarily ordered) binary tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode<T> {
    pub value: T,
    pub left: Option<Box<PathNode<T>>>,
    pub right: Option<Box<PathNode<T>>>,
}

impl<T> PathNode<T> {
    pub fn leaf(value: T) -> Self {
        PathNode {
            value,
            left: None,
            right: None,
        }
    }

    pub fn new(value: T, left: Option<PathNode<T>>, right: Option<PathNode<T>>) -> Self {
        PathNode {
            value,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }
}

/// True iff every root-to-leaf path has the same length. An empty tree and
/// a lone root both qualify.
pub fn equal_paths<T>(root: Option<&PathNode<T>>) -> bool {
    // Depth of the leaves below `node` if they all agree.
    fn leaf_depth<T>(node: &PathNode<T>) -> Option<usize> {
        match (node.left.as_deref(), node.right.as_deref()) {
            (None, None) => Some(1),
            (Some(child), None) | (None, Some(child)) => Some(leaf_depth(child)? + 1),
            (Some(l), Some(r)) => {
                let depth = leaf_depth(l)?;
                (leaf_depth(r)? == depth).then_some(depth + 1)
            }
        }
    }
    root.map_or(true, |r| leaf_depth(r).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(v: i32) -> Option<PathNode<i32>> {
        Some(PathNode::leaf(v))
    }

    #[test]
    fn test_trivial_trees() {
        assert!(equal_paths::<i32>(None));
        assert!(equal_paths(Some(&PathNode::leaf(1))));
    }

    #[test]
    fn test_single_chain() {
        // 1 - 2 - 3, only one leaf
        let tree = PathNode::new(1, Some(PathNode::new(2, None, leaf(3))), None);
        assert!(equal_paths(Some(&tree)));
    }

    #[test]
    fn test_uneven_leaves() {
        //     1
        //    / \
        //   2   3
        //  /
        // 4
        let tree = PathNode::new(1, Some(PathNode::new(2, leaf(4), None)), leaf(3));
        assert!(!equal_paths(Some(&tree)));
    }

    #[test]
    fn test_same_height_but_uneven_inside() {
        // both children have height 3, but the left one hides a shallow leaf
        let left = PathNode::new(2, Some(PathNode::new(4, leaf(8), None)), leaf(5));
        let right = PathNode::new(3, Some(PathNode::new(6, leaf(9), None)), None);
        let tree = PathNode::new(1, Some(left), Some(right));
        assert!(!equal_paths(Some(&tree)));
    }

    #[test]
    fn test_full_tree() {
        let tree = PathNode::new(
            1,
            Some(PathNode::new(2, leaf(4), leaf(5))),
            Some(PathNode::new(3, leaf(6), None)),
        );
        assert!(equal_paths(Some(&tree)));
    }
}
