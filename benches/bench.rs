use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ordtree::{avl::AvlTree, rbtree::RbTree, unbalanced::UnbalancedTree};

#[derive(Clone)]
enum TreeEnum<K> {
    Avl(AvlTree<K>),
    RedBlack(RbTree<K>),
    Unbalanced(UnbalancedTree<K>),
}

impl<K> TreeEnum<K> {
    fn contains(&self, k: &K) -> bool
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => t.contains(k),
            Self::RedBlack(t) => t.contains(k),
            Self::Unbalanced(t) => t.contains(k),
        }
    }

    fn insert(&mut self, k: K)
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => {
                t.insert(k);
            }
            Self::RedBlack(t) => {
                t.insert(k);
            }
            Self::Unbalanced(t) => {
                t.insert(k);
            }
        }
    }

    fn remove(&mut self, k: &K)
    where
        K: Ord,
    {
        match self {
            Self::Avl(t) => {
                t.remove(k);
            }
            Self::RedBlack(t) => {
                t.remove(k);
            }
            Self::Unbalanced(t) => {
                t.remove(k);
            }
        }
    }
}

/// Builds a tree by inserting keys in a balanced order. This adds keys so that, without any
/// self-balancing, the resultant tree will still be balanced. That keeps the unbalanced tree
/// comparable; the sorted-input case below shows what happens otherwise.
fn fill_balanced(tree: &mut TreeEnum<i32>, xs: &[i32]) {
    if !xs.is_empty() {
        let mid = xs.len() / 2;
        tree.insert(xs[mid]);
        fill_balanced(tree, &xs[..mid]);
        fill_balanced(tree, &xs[mid + 1..]);
    }
}

/// Helper to bench a function on a tree.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// implementations of trees before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut TreeEnum<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2i32.pow(num_levels) - 1;
        let largest_key_in_tree = num_nodes - 1;
        let xs: Vec<i32> = (0..num_nodes).collect();

        let tree_tests = [
            ("avl", TreeEnum::Avl(AvlTree::new())),
            ("red-black", TreeEnum::RedBlack(RbTree::new())),
            ("unbalanced", TreeEnum::Unbalanced(UnbalancedTree::new())),
        ];
        for (name, mut tree) in tree_tests {
            fill_balanced(&mut tree, &xs);
            let id = BenchmarkId::new(name, largest_key_in_tree);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_key_in_tree));
                        time += instant.elapsed();
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

/// Inserting sorted keys: logarithmic per key for the balanced trees, linear for the plain one.
fn bench_sorted_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted-inserts");

    for num_nodes in [1 << 6, 1 << 10] {
        group.bench_with_input(BenchmarkId::new("avl", num_nodes), &num_nodes, |b, &n| {
            b.iter(|| (0..n).collect::<AvlTree<i32>>())
        });
        group.bench_with_input(BenchmarkId::new("red-black", num_nodes), &num_nodes, |b, &n| {
            b.iter(|| (0..n).collect::<RbTree<i32>>())
        });
        group.bench_with_input(BenchmarkId::new("unbalanced", num_nodes), &num_nodes, |b, &n| {
            b.iter(|| (0..n).collect::<UnbalancedTree<i32>>())
        });
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "find", |tree, i| {
        let _found = black_box(tree.contains(&i));
    });
    bench_helper(c, "delete", |tree, i| {
        tree.remove(&i);
    });

    bench_helper(c, "insert", |tree, i| {
        tree.insert(i + 1);
    });

    bench_helper(c, "find-miss", |tree, i| {
        let _found = black_box(tree.contains(&(i + 1)));
    });
    bench_helper(c, "delete-miss", |tree, i| {
        tree.remove(&(i + 1));
    });

    bench_sorted_inserts(c);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
