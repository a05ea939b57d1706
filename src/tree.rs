use std::{
    borrow::Borrow,
    cmp::Ordering::*,
    fmt::{self, Debug},
    marker::PhantomData,
    ptr::NonNull,
};

use log::{debug, error, trace};

use crate::{
    ComingFrom, Node, NodePtrExt, Root, Tree,
    alloc::{alloc_node, own_back},
};

/// A summary of the tree's shape, as served by monitoring endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub len: usize,
    pub height: usize,
    /// Black nodes on any path from the root down to NIL, the root excluded.
    pub black_height: usize,
    pub valid: bool,
}

// SAFETY: the tree exclusively owns its nodes and every mutation goes through
// `&mut self`.
unsafe impl<K: Send> Send for Tree<K> {}
unsafe impl<K: Sync> Sync for Tree<K> {}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        self.free_all();
    }
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug> Debug for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> Tree<K> {
    pub const fn new() -> Self {
        Tree {
            root: Root::new(),
            len: 0,
            _owns: PhantomData,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The key at the root, if any.
    pub fn root(&self) -> Option<&K> {
        self.root.root.map(|n| &unsafe { n.as_ref() }.key)
    }

    pub fn first(&self) -> Option<&K> {
        self.root.first().map(|n| &unsafe { n.as_ref() }.key)
    }

    pub fn last(&self) -> Option<&K> {
        self.root.last().map(|n| &unsafe { n.as_ref() }.key)
    }

    /// Number of nodes on the longest path from the root down to NIL; zero
    /// for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        if let Some(root) = self.root.root {
            stack.push((root, 1));
        }
        while let Some((node, depth)) = stack.pop() {
            let node = unsafe { node.as_ref() };
            height = height.max(depth);
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    /// Black nodes on the leftmost root-to-NIL path, the root excluded. In a
    /// valid tree every path agrees.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        let mut current = self.root.root.left();
        while let Some(node) = current {
            let node = unsafe { node.as_ref() };
            count += usize::from(node.is_black());
            current = node.left;
        }
        count
    }

    fn free_all(&mut self) -> usize {
        let mut freed = 0;
        let mut current = self.root.root.take();
        // Walk down to a leaf, free it, detach it from its parent and resume
        // at the parent; no rebalancing, no recursion.
        while let Some(node) = current {
            let node_ref = unsafe { node.as_ref() };
            if node_ref.left.is_some() {
                current = node_ref.left;
                continue;
            }
            if node_ref.right.is_some() {
                current = node_ref.right;
                continue;
            }
            current = node_ref.parent();
            if current.left() == Some(node) {
                current.set_left(None);
            } else {
                current.set_right(None);
            }
            // SAFETY: node is a leaf and no longer linked.
            drop(unsafe { own_back(node) });
            freed += 1;
        }
        self.len = 0;
        freed
    }

    fn erase(&mut self, node: NonNull<Node<K>>) -> K {
        self.root.erase(node);
        self.len -= 1;
        // SAFETY: erase unlinked the node from the tree.
        unsafe { own_back(node) }.key
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Option<NonNull<Node<K>>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root.root;
        while let Some(candidate) = node {
            let candidate = unsafe { candidate.as_ref() };
            match key.cmp(candidate.key.borrow()) {
                Equal => break,
                Greater => node = candidate.right,
                Less => node = candidate.left,
            }
        }
        node
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// The stored key equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|n| &unsafe { n.as_ref() }.key)
    }
}

impl<K: Ord> Tree<K> {
    /// Adds `key`. Returns `false` and leaves the tree untouched when an equal
    /// key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        let mut parent = None;
        let mut from = ComingFrom::Left;
        let mut link = self.root.root;
        while let Some(candidate) = link {
            let candidate = unsafe { candidate.as_ref() };
            match key.cmp(&candidate.key) {
                Equal => {
                    trace!("insert: key already present, ignoring");
                    return false;
                }
                Greater => {
                    parent = link;
                    from = ComingFrom::Right;
                    link = candidate.right;
                }
                Less => {
                    parent = link;
                    from = ComingFrom::Left;
                    link = candidate.left;
                }
            }
        }

        let node = alloc_node(key);
        self.root.link(node, parent, from);
        self.root.insert_fixup(node);
        self.len += 1;
        self.audit("insert");
        true
    }

    /// Removes `key`. Returns `false` and leaves the tree untouched when it is
    /// absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes and returns the stored key equal to `key`.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node) = self.find(key) else {
            trace!("remove: key absent");
            return None;
        };
        let key = self.erase(node);
        self.audit("remove");
        Some(key)
    }

    pub fn pop_first(&mut self) -> Option<K> {
        let node = self.root.first()?;
        let key = self.erase(node);
        self.audit("pop_first");
        Some(key)
    }

    pub fn pop_last(&mut self) -> Option<K> {
        let node = self.root.last()?;
        let key = self.erase(node);
        self.audit("pop_last");
        Some(key)
    }

    /// Frees every node. The tree is as good as new afterwards.
    pub fn clear(&mut self) {
        let freed = self.free_all();
        debug!("clear: freed {freed} nodes");
        self.audit("clear");
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            len: self.len,
            height: self.height(),
            black_height: self.black_height(),
            valid: self.is_valid_rb_tree(),
        }
    }

    #[inline(always)]
    fn audit(&self, operation: &str) {
        if !cfg!(any(test, feature = "check-invariants")) {
            return;
        }
        if let Err(violation) = self.validate() {
            error!("{operation}: {violation}");
            panic!("{operation} broke the red-black invariants: {violation}");
        }
    }
}
