use avlbst::config::{ConfigT, DebugConfig, DefaultDebug};
use avlbst::shared_string_writer::SharedStringWriter;
use avlbst::{AvlTree, KeyError};

#[cfg(test)]
mod tests {
    use super::*;

    use expect_test::expect;
    use itertools::Itertools;
    use rand::prelude::*;
    use rand_pcg::Pcg64;
    use std::collections::BTreeMap;

    fn assert_sorted_and_balanced<V, C: ConfigT>(tree: &AvlTree<i32, V, C>) {
        assert!(tree.is_balanced());
        assert!(tree.keys().tuple_windows().all(|(a, b)| a < b));
        tree.check_invariants();
    }

    #[test]
    fn round_trip_remove_root_and_inner() {
        let writer = SharedStringWriter::new();
        let mut tree: DefaultDebug<i32, i32> = AvlTree::with_debug_writer(writer.clone());
        for k in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(k, -k);
            assert_sorted_and_balanced(&tree);
        }
        tree.remove(&5);
        assert_sorted_and_balanced(&tree);
        tree.remove(&8);
        assert_sorted_and_balanced(&tree);

        let remaining: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(remaining, vec![(1, -1), (3, -3), (4, -4), (7, -7), (9, -9)]);

        let expect = expect![[r#"
            insert: new node 0
            insert: new node 1
            insert: new node 2
            insert: new node 3
            insert: new node 4
            insert: new node 5
            insert: new node 6
            remove: swapped payload of 0 with predecessor 4
            remove: freed node 4
            remove: swapped payload of 2 with predecessor 5
            remove: freed node 5
        "#]];
        expect.assert_eq(writer.borrow().as_ref());
    }

    #[test]
    fn two_children_deletion_with_deep_predecessor() {
        //            20
        //        10        30
        //      5    15   25  35
        //     3 7  12 17       40
        //                 (18 under 17)
        let mut tree: DefaultDebug<i32, &str> = AvlTree::new_with_config();
        for k in [20, 10, 30, 5, 15, 25, 35, 3, 7, 12, 17, 40, 18] {
            tree.insert(k, "v");
        }
        let before = tree.len();
        tree.remove(&20);
        assert_eq!(tree.len(), before - 1);
        assert_eq!(tree.get(&20), None);
        assert_eq!(tree.find(&20), Err(KeyError));
        // 18 was the rightmost key of the left subtree
        assert_eq!(
            tree.keys().copied().collect::<Vec<_>>(),
            vec![3, 5, 7, 10, 12, 15, 17, 18, 25, 30, 35, 40]
        );
        assert_eq!(tree.keys().unique().count(), tree.len());
        assert_sorted_and_balanced(&tree);
    }

    #[test]
    fn ascending_and_descending_inserts_never_exceed_one() {
        let mut up: AvlTree<i32, i32, DebugConfig> = AvlTree::new_with_config();
        let mut down: AvlTree<i32, i32, DebugConfig> = AvlTree::new_with_config();
        for k in 1..=64 {
            up.insert(k, k);
            down.insert(65 - k, k);
            assert_sorted_and_balanced(&up);
            assert_sorted_and_balanced(&down);
        }
        assert_eq!(up.height(), 7);
        assert_eq!(down.height(), 7);
    }

    #[test]
    fn duplicate_insert_only_changes_value() {
        let mut tree: AvlTree<i32, i32> = (0..20).map(|k| (k, 0)).collect();
        let shape = tree.to_pretty_string().replace(": 0", "");
        for k in 0..20 {
            tree.insert(k, k);
        }
        assert_eq!(tree.len(), 20);
        let reshaped = tree
            .to_pretty_string()
            .lines()
            .map(|line| line.split(':').next().unwrap_or_default().to_string())
            .join("\n");
        assert_eq!(reshaped, shape.trim_end());
        assert!(tree.iter().all(|(k, v)| k == v));
    }

    #[test]
    fn get_mut_and_lookup_errors() {
        let mut tree: AvlTree<&str, Vec<i32>> = AvlTree::new();
        tree.insert("a", vec![]);
        if let Some(v) = tree.get_mut(&"a") {
            v.push(1);
        }
        assert_eq!(tree.find(&"a"), Ok(&vec![1]));
        assert_eq!(tree.find(&"b").unwrap_err().to_string(), "key not found");
        assert_eq!(tree.first_key_value(), Some((&"a", &vec![1])));
        assert_eq!(format!("{:?}", tree), r#"{"a": [1]}"#);
    }

    #[test]
    fn seeded_random_workload_matches_btreemap() {
        let mut rng = Pcg64::seed_from_u64(5);
        let mut tree: AvlTree<i32, u32> = AvlTree::new();
        let mut model = BTreeMap::new();
        for step in 0..5_000 {
            let key = rng.random_range(0..300);
            if rng.random_bool(0.6) {
                let value = rng.random::<u32>();
                tree.insert(key, value);
                model.insert(key, value);
            } else {
                tree.remove(&key);
                model.remove(&key);
            }
            if step % 97 == 0 {
                assert_sorted_and_balanced(&tree);
            }
        }
        assert_sorted_and_balanced(&tree);
        assert_eq!(tree.len(), model.len());
        assert!(tree.iter().eq(model.iter()));
    }
}
