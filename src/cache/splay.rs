//! Splay Cache Module
//!
//! Unbounded self-adjusting binary search tree. Every search or insert
//! splays the touched key toward the root, so repeated and sequential
//! access patterns get cheaper over time.

use std::cmp::Ordering;

use crate::cache::{CacheStats, MemoCache};
use crate::error::{CacheError, Result};

type Link<K, V> = Option<Box<Node<K, V>>>;

// == Node ==
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

// == Splay Cache ==
/// Key-value cache backed by a splay tree.
///
/// In-order traversal always yields strictly increasing keys. The tree owns
/// every node through exactly one parent link.
#[derive(Debug)]
pub struct SplayCache<K, V> {
    root: Link<K, V>,
    len: usize,
    rotations: u64,
    stats: CacheStats,
}

impl<K, V> Default for SplayCache<K, V> {
    fn default() -> Self {
        Self {
            root: None,
            len: 0,
            rotations: 0,
            stats: CacheStats::new(),
        }
    }
}

impl<K: Ord, V> SplayCache<K, V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Search ==
    /// Splays the tree at `key` and returns its value if present.
    ///
    /// The splay happens on a miss too: the node where the search ended
    /// becomes the root.
    pub fn search(&mut self, key: &K) -> Option<&V> {
        self.root = splay(self.root.take(), key, &mut self.rotations);

        match self.root.as_deref() {
            Some(root) if root.key == *key => {
                self.stats.record_hit();
                Some(&root.value)
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores `value` under `key` and makes `key` the root.
    ///
    /// Re-inserting an existing key overwrites its value without adding a
    /// node.
    pub fn insert(&mut self, key: K, value: V) {
        let Some(mut root) = splay(self.root.take(), &key, &mut self.rotations) else {
            self.root = Some(Node::leaf(key, value));
            self.len = 1;
            return;
        };

        let new_root = match key.cmp(&root.key) {
            Ordering::Equal => {
                root.value = value;
                root
            }
            Ordering::Less => {
                let left = root.left.take();
                self.len += 1;
                Box::new(Node {
                    key,
                    value,
                    left,
                    right: Some(root),
                })
            }
            Ordering::Greater => {
                let right = root.right.take();
                self.len += 1;
                Box::new(Node {
                    key,
                    value,
                    left: Some(root),
                    right,
                })
            }
        };
        self.root = Some(new_root);
    }

    // == Peek ==
    /// Plain BST lookup that leaves the tree shape untouched.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(&node.value),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    pub fn contains(&self, key: &K) -> bool {
        self.peek(key).is_some()
    }

    /// Returns the key currently at the root.
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_deref().map(|node| &node.key)
    }

    /// Collects keys in in-order (ascending) sequence.
    pub fn keys_in_order(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node<K, V>> = Vec::new();
        let mut current = self.root.as_deref();

        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                keys.push(&node.key);
                current = node.right.as_deref();
            }
        }
        keys
    }

    /// Returns the number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 0));
        }
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    // == Check Invariants ==
    /// Verifies strict in-order key ordering and the node count.
    pub fn check_invariants(&self) -> Result<()> {
        let keys = self.keys_in_order();
        if keys.len() != self.len {
            return Err(CacheError::Invariant(format!(
                "tree holds {} nodes but len is {}",
                keys.len(),
                self.len
            )));
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(CacheError::Invariant(
                "in-order keys are not strictly increasing".to_string(),
            ));
        }
        Ok(())
    }
}

impl<K, V> SplayCache<K, V> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total rotations performed since construction.
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len);
        stats
    }

    // == Clear ==
    /// Drops every node without recursing.
    pub fn clear(&mut self) {
        let mut pending: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
        self.stats.record_invalidations(self.len);
        self.len = 0;
    }
}

impl<K, V> Drop for SplayCache<K, V> {
    fn drop(&mut self) {
        // Sequential inserts build a list-shaped tree; recursive drop could
        // overflow the stack on it.
        self.clear();
    }
}

impl<K: Ord, V: Clone> MemoCache<K, V> for SplayCache<K, V> {
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.search(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn len(&self) -> usize {
        SplayCache::len(self)
    }

    fn stats(&self) -> CacheStats {
        SplayCache::stats(self)
    }
}

// == Rotations ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl<K, V> Node<K, V> {
    fn child_mut(&mut self, side: Side) -> &mut Link<K, V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Lifts the left child above `node`. No-op without a left child.
fn rotate_right<K, V>(mut node: Box<Node<K, V>>, rotations: &mut u64) -> Box<Node<K, V>> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            pivot.right = Some(node);
            *rotations += 1;
            pivot
        }
        None => node,
    }
}

/// Lifts the right child above `node`. No-op without a right child.
fn rotate_left<K, V>(mut node: Box<Node<K, V>>, rotations: &mut u64) -> Box<Node<K, V>> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            pivot.left = Some(node);
            *rotations += 1;
            pivot
        }
        None => node,
    }
}

/// Lifts the child on `side` above `node`.
fn lift<K, V>(node: Box<Node<K, V>>, side: Side, rotations: &mut u64) -> Box<Node<K, V>> {
    match side {
        Side::Left => rotate_right(node, rotations),
        Side::Right => rotate_left(node, rotations),
    }
}

// == Splay ==
/// How a pending level finishes once the subtree below it is splayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Child matches the key; nothing below to splay
    Zig,
    /// Key continues on the child's same side
    ZigZig,
    /// Key continues on the child's opposite side
    ZigZag,
}

/// One level of the search path waiting for its grandchild subtree.
struct Frame<K, V> {
    root: Box<Node<K, V>>,
    child: Box<Node<K, V>>,
    side: Side,
    step: Step,
}

/// Brings `key`, or the last node on its search path, to the root.
///
/// Walks down two levels per frame, then rebuilds bottom-up: zig-zig
/// rotates the grandparent first, zig-zag rotates the child first, and
/// every frame ends with one rotation lifting its child. Pending frames
/// live on the heap, so the depth of the tree never reaches the call stack.
fn splay<K: Ord, V>(root: Link<K, V>, key: &K, rotations: &mut u64) -> Link<K, V> {
    let mut frames: Vec<Frame<K, V>> = Vec::new();
    let mut next = root;

    let mut splayed = loop {
        let Some(mut node) = next else {
            break None;
        };
        let side = match key.cmp(&node.key) {
            Ordering::Equal => break Some(node),
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };
        let Some(mut child) = node.child_mut(side).take() else {
            break Some(node);
        };

        let step = match (side, key.cmp(&child.key)) {
            (_, Ordering::Equal) => Step::Zig,
            (Side::Left, Ordering::Less) | (Side::Right, Ordering::Greater) => Step::ZigZig,
            _ => Step::ZigZag,
        };
        next = match step {
            Step::Zig => None,
            Step::ZigZig => child.child_mut(side).take(),
            Step::ZigZag => child.child_mut(side.flip()).take(),
        };
        frames.push(Frame {
            root: node,
            child,
            side,
            step,
        });
    };

    while let Some(Frame {
        mut root,
        mut child,
        side,
        step,
    }) = frames.pop()
    {
        match step {
            Step::Zig => {
                *root.child_mut(side) = Some(child);
            }
            Step::ZigZig => {
                *child.child_mut(side) = splayed;
                *root.child_mut(side) = Some(child);
                root = lift(root, side, rotations);
            }
            Step::ZigZag => {
                let inner = side.flip();
                *child.child_mut(inner) = splayed;
                if child.child_mut(inner).is_some() {
                    child = lift(child, inner, rotations);
                }
                *root.child_mut(side) = Some(child);
            }
        }

        splayed = Some(if root.child_mut(side).is_some() {
            lift(root, side, rotations)
        } else {
            root
        });
    }

    splayed
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[i32]) -> SplayCache<i32, i32> {
        let mut tree = SplayCache::new();
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    #[test]
    fn test_splay_new() {
        let mut tree: SplayCache<i32, i32> = SplayCache::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.search(&1), None);
        assert_eq!(tree.root_key(), None);
    }

    #[test]
    fn test_splay_insert_and_search() {
        let mut tree = tree_of(&[50, 30, 70, 20, 40, 60, 80]);

        for key in [20, 30, 40, 50, 60, 70, 80] {
            assert_eq!(tree.search(&key), Some(&(key * 10)));
        }
        assert_eq!(tree.len(), 7);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_splay_insert_becomes_root() {
        let mut tree = tree_of(&[5, 1, 9]);
        tree.insert(7, 70);

        assert_eq!(tree.root_key(), Some(&7));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_splay_search_hit_promotes_to_root() {
        let mut tree = tree_of(&[10, 20, 30, 40, 50, 60]);

        for key in [10, 60, 35, 30, 50] {
            if tree.search(&key).is_some() {
                assert_eq!(tree.root_key(), Some(&key));
            }
        }
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_splay_search_miss_still_splays() {
        // Increasing inserts leave 1 at the bottom of a left spine.
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let before = tree.rotations();

        assert_eq!(tree.search(&0), None);

        assert!(tree.rotations() > before);
        assert_eq!(tree.root_key(), Some(&1));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_splay_reinsert_overwrites_in_place() {
        let mut tree = tree_of(&[3, 1, 2]);

        tree.insert(2, 200);
        tree.insert(2, 300);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.search(&2), Some(&300));
        assert_eq!(tree.keys_in_order(), vec![&1, &2, &3]);
    }

    #[test]
    fn test_splay_sequential_access_flattens() {
        let mut tree = tree_of(&(0..64).collect::<Vec<_>>());
        assert_eq!(tree.height(), 63);

        tree.search(&0);

        assert!(tree.height() < 63);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_splay_spine_rotation_shape() {
        // 8 -> 7 -> ... -> 1 along left links; splaying 1 takes one zig and
        // three zig-zig steps.
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7, 8]);

        assert_eq!(tree.search(&1), Some(&10));

        assert_eq!(tree.rotations(), 7);
        assert_eq!(tree.root_key(), Some(&1));
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.keys_in_order(), vec![&1, &2, &3, &4, &5, &6, &7, &8]);
    }

    #[test]
    fn test_splay_deep_spine_search_and_insert() {
        let mut tree: SplayCache<u32, u32> = SplayCache::new();
        for key in 0..200_000 {
            tree.insert(key, key);
        }
        assert_eq!(tree.height(), 199_999);

        assert_eq!(tree.search(&0), Some(&0));
        assert_eq!(tree.root_key(), Some(&0));
        assert!(tree.height() < 199_999);

        assert_eq!(tree.search(&199_999), Some(&199_999));
        tree.insert(100_000, 7);
        assert_eq!(tree.root_key(), Some(&100_000));
        assert_eq!(tree.search(&100_000), Some(&7));
        assert_eq!(tree.len(), 200_000);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_splay_deep_spine_miss_below_minimum() {
        let mut tree: SplayCache<i64, i64> = SplayCache::new();
        for key in (0..100_000).rev() {
            tree.insert(key, key);
        }

        assert_eq!(tree.search(&200_000), None);
        assert_eq!(tree.root_key(), Some(&99_999));
        tree.insert(-1, -1);
        assert_eq!(tree.root_key(), Some(&-1));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn test_splay_peek_does_not_rotate() {
        let tree = tree_of(&[4, 2, 6, 1, 3]);
        let root = tree.root_key().copied();

        assert_eq!(tree.peek(&6), Some(&60));
        assert_eq!(tree.peek(&5), None);
        assert!(tree.contains(&1));
        assert_eq!(tree.root_key().copied(), root);
    }

    #[test]
    fn test_splay_stats() {
        let mut tree = tree_of(&[1, 2]);
        tree.search(&1);
        tree.search(&9);

        let stats = tree.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 2);
    }

    #[test]
    fn test_splay_clear() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.clear();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.search(&1), None);
    }

    #[test]
    fn test_splay_drop_deep_tree() {
        let tree = tree_of(&(0..200_000).collect::<Vec<_>>());
        assert_eq!(tree.len(), 200_000);
        drop(tree);
    }
}
