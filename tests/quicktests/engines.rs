use ordtree::avl::AvlTree;
use ordtree::rbtree::RbTree;
use ordtree::unbalanced::UnbalancedTree;
use ordtree::SearchTree;
use quickcheck_macros::quickcheck;

use std::collections::{BTreeSet, HashSet};

use crate::Op;

/// The keys of a tree in order, found by walking successors from the minimum.
fn in_order<T: SearchTree<i8>>(tree: &T) -> Vec<i8> {
    std::iter::successors(tree.minimum(), |n| tree.successor(n.key()))
        .map(|n| *n.key())
        .collect()
}

/// Applies a set of operations to a tree and a set, checking every invariant after each one.
/// This way we can ensure that after a random smattering of inserts and deletes we have the same
/// keys in both and the tree was never malformed in between.
fn do_ops<T>(ops: &[Op<i8>], tree: &mut T, set: &mut BTreeSet<i8>) -> bool
where
    T: SearchTree<i8>,
{
    for op in ops {
        let agrees = match *op {
            Op::Insert(k) => tree.insert(k) == set.insert(k),
            Op::Remove(k) => tree.remove(&k) == set.take(&k),
        };
        if !agrees || tree.check().is_err() {
            return false;
        }
    }
    true
}

fn matches_btreeset<T: SearchTree<i8> + Default>(ops: &[Op<i8>]) -> bool {
    let mut tree = T::default();
    let mut set = BTreeSet::new();

    do_ops(ops, &mut tree, &mut set) && in_order(&tree).iter().eq(set.iter())
}

fn round_trip<T: SearchTree<i8> + Default>(xs: &[i8], key: i8) -> bool {
    let mut tree = T::default();
    for &x in xs {
        tree.insert(x);
    }
    if tree.contains(&key) {
        return true;
    }
    let before = in_order(&tree);

    tree.insert(key);
    tree.remove(&key);

    in_order(&tree) == before && tree.check().is_ok()
}

fn remove_absent_is_noop<T: SearchTree<i8> + Default>(xs: &[i8], key: i8) -> bool {
    let mut tree = T::default();
    for &x in xs.iter().filter(|&&x| x != key) {
        tree.insert(x);
    }
    let before = in_order(&tree);
    let root = tree.root().map(|n| *n.key());

    tree.remove(&key).is_none()
        && in_order(&tree) == before
        && tree.root().map(|n| *n.key()) == root
}

fn with_deletions<T: SearchTree<i8> + Default>(xs: &[i8], deletes: &[i8]) -> bool {
    let mut tree = T::default();
    for &x in xs {
        tree.insert(x);
    }
    for delete in deletes {
        tree.remove(delete);
    }

    let deleted: HashSet<_> = deletes.iter().collect();
    deletes.iter().all(|x| !tree.contains(x))
        && xs
            .iter()
            .filter(|x| !deleted.contains(x))
            .all(|x| tree.contains(x))
}

fn extremes_and_successors<T: SearchTree<i8> + Default>(xs: &[i8]) -> bool {
    let mut tree = T::default();
    for &x in xs {
        tree.insert(x);
    }
    let sorted: Vec<_> = xs.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    tree.minimum().map(|n| *n.key()) == sorted.first().copied()
        && tree.maximum().map(|n| *n.key()) == sorted.last().copied()
        && sorted
            .windows(2)
            .all(|pair| tree.successor(&pair[0]).map(|n| *n.key()) == Some(pair[1]))
        && sorted
            .last()
            .map_or(true, |max| tree.successor(max).is_none())
}

#[quickcheck]
fn avl_matches_btreeset(ops: Vec<Op<i8>>) -> bool {
    matches_btreeset::<AvlTree<i8>>(&ops)
}

#[quickcheck]
fn rb_matches_btreeset(ops: Vec<Op<i8>>) -> bool {
    matches_btreeset::<RbTree<i8>>(&ops)
}

#[quickcheck]
fn unbalanced_matches_btreeset(ops: Vec<Op<i8>>) -> bool {
    matches_btreeset::<UnbalancedTree<i8>>(&ops)
}

#[quickcheck]
fn avl_round_trip(xs: Vec<i8>, key: i8) -> bool {
    round_trip::<AvlTree<i8>>(&xs, key)
}

#[quickcheck]
fn rb_round_trip(xs: Vec<i8>, key: i8) -> bool {
    round_trip::<RbTree<i8>>(&xs, key)
}

#[quickcheck]
fn avl_remove_absent_is_noop(xs: Vec<i8>, key: i8) -> bool {
    remove_absent_is_noop::<AvlTree<i8>>(&xs, key)
}

#[quickcheck]
fn rb_remove_absent_is_noop(xs: Vec<i8>, key: i8) -> bool {
    remove_absent_is_noop::<RbTree<i8>>(&xs, key)
}

#[quickcheck]
fn avl_with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    with_deletions::<AvlTree<i8>>(&xs, &deletes)
}

#[quickcheck]
fn rb_with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    with_deletions::<RbTree<i8>>(&xs, &deletes)
}

#[quickcheck]
fn avl_extremes_and_successors(xs: Vec<i8>) -> bool {
    extremes_and_successors::<AvlTree<i8>>(&xs)
}

#[quickcheck]
fn rb_extremes_and_successors(xs: Vec<i8>) -> bool {
    extremes_and_successors::<RbTree<i8>>(&xs)
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let avl: AvlTree<_> = xs.iter().copied().collect();
    let rb: RbTree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| avl.search(x).is_none() && rb.search(x).is_none())
}
