use std::{
    fmt::Debug,
    ptr::{self, NonNull},
};

use super::{Color, Node, NodePtr, NodePtrExt};

impl<K> Node<K> {
    /// A fresh node is red and unlinked: a null parent word has its color bit
    /// cleared.
    pub(crate) fn new(key: K) -> Self {
        Node {
            parent_color: ptr::null_mut(),
            right: None,
            left: None,
            key,
        }
    }

    #[inline(always)]
    pub(crate) fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    #[inline(always)]
    pub(crate) fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    #[inline(always)]
    pub(crate) fn color(&self) -> Color {
        Color::from(self.parent_color.addr() & 1)
    }

    #[inline(always)]
    pub(crate) fn parent(&self) -> NodePtr<K> {
        NonNull::new(self.parent_color.map_addr(|p| p & !1))
    }

    #[inline(always)]
    pub(crate) fn set_parent(&mut self, parent: NodePtr<K>) {
        self.set_parent_and_color(parent, self.color());
    }

    #[inline(always)]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.set_parent_and_color(self.parent(), color);
    }

    #[inline(always)]
    pub(crate) fn set_parent_and_color(&mut self, parent: NodePtr<K>, color: Color) {
        let parent = parent.map_or(ptr::null_mut(), NonNull::as_ptr);
        self.parent_color = parent.map_addr(|p| p | usize::from(color));
    }

    /// The node holding the smallest key under `node`.
    #[inline(always)]
    pub(crate) fn leftmost(mut node: NonNull<Node<K>>) -> NonNull<Node<K>> {
        // SAFETY: every link reachable from a live node is a live node.
        while let Some(left) = unsafe { node.as_ref() }.left {
            node = left;
        }
        node
    }

    /// The node holding the largest key under `node`.
    #[inline(always)]
    pub(crate) fn rightmost(mut node: NonNull<Node<K>>) -> NonNull<Node<K>> {
        while let Some(right) = unsafe { node.as_ref() }.right {
            node = right;
        }
        node
    }

    /// In-order successor.
    #[inline(always)]
    pub(crate) fn next(&self) -> NodePtr<K> {
        // If we have a right-hand child, go down and then left as far as we
        // can.
        if let Some(right) = self.right {
            return Some(Node::leftmost(right));
        }
        // No right-hand children. Everything down and left is smaller than us,
        // so any 'next' node must be in the general direction of our parent.
        // Keep going up while we are a right-hand child; the first parent we
        // reach from its left side is the successor.
        let mut current: NodePtr<K> = self.into();
        let mut parent = self.parent();
        while parent.is_some() && parent.right() == current {
            current = parent;
            parent = current.parent();
        }
        parent
    }

    /// In-order predecessor, the mirror of [`Node::next`].
    #[inline(always)]
    pub(crate) fn prev(&self) -> NodePtr<K> {
        if let Some(left) = self.left {
            return Some(Node::rightmost(left));
        }
        let mut current: NodePtr<K> = self.into();
        let mut parent = self.parent();
        while parent.is_some() && parent.left() == current {
            current = parent;
            parent = current.parent();
        }
        parent
    }
}

impl<K> Debug for Node<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}::({:?})", self.color(), self.key))
    }
}
