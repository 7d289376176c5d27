use avlbst::config::{DebugConfig, DefaultDebug};
use avlbst::equal_paths::{equal_paths, PathNode};
use avlbst::AvlTree;
use rand::prelude::*;
use rand_pcg::Pcg64;
use tracing_subscriber::EnvFilter;

fn round_trip() {
    let mut tree: DefaultDebug<i32, i32> = AvlTree::new_with_config();
    for k in [5, 3, 8, 1, 4, 7, 9] {
        tree.insert(k, k * 10);
    }
    print!("{}", tree.to_pretty_string());
    tree.remove(&5);
    tree.remove(&8);
    println!("after removing 5 and 8:");
    print!("{}", tree.to_pretty_string());
    println!("find(5): {:?}", tree.find(&5));
}

fn ascending() {
    let tree: AvlTree<u32, u32, DebugConfig> = (1..=7).map(|k| (k, k * k)).collect();
    println!("ascending 1..=7, height {}:", tree.height());
    print!("{}", tree.to_pretty_string());
}

fn random_workload(seed: u64, ops: usize) {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut tree = AvlTree::new();
    for _ in 0..ops {
        let key = rng.random_range(0..1000u32);
        if rng.random_bool(0.7) {
            tree.insert(key, rng.random::<u64>());
        } else {
            tree.remove(&key);
        }
    }
    tree.check_invariants();
    println!(
        "random workload (seed {seed}, {ops} ops): {} keys, height {}, balanced: {}",
        tree.len(),
        tree.height(),
        tree.is_balanced()
    );
}

fn paths() {
    let tree = PathNode::new(
        1,
        Some(PathNode::new(2, Some(PathNode::leaf(4)), None)),
        Some(PathNode::leaf(3)),
    );
    println!("equal_paths: {}", equal_paths(Some(&tree)));
}

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    round_trip();
    ascending();
    random_workload(5, 10_000);
    paths();
}
