//! An ordered set of unique keys stored in a red-black tree.
//!
//! The balancing code follows the linux kernel's layout: the color of a node
//! lives in the lowest bit of its parent pointer, and an absent child or
//! parent is simply `None`, which always reads as black.
//!
//! ```
//! use rougeset::Tree;
//!
//! let mut tree = Tree::new();
//! for key in [7, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13] {
//!     tree.insert(key);
//! }
//! assert!(tree.is_valid_rb_tree());
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [2, 3, 6, 7, 8, 10, 11, 13, 18, 22, 26]);
//! ```
mod alloc;
mod iter;
mod node;
mod root;
mod tree;
mod validate;
mod view;


use std::{marker::PhantomData, ptr::NonNull};

pub use iter::{IntoIter, Iter};
pub use tree::TreeStats;
pub use validate::Violation;
pub use view::NodeView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red = 0,
    Black = 1,
}

impl From<Color> for usize {
    fn from(color: Color) -> usize {
        color as usize
    }
}

impl From<usize> for Color {
    fn from(color: usize) -> Color {
        match color {
            0 => Color::Red,
            _ => Color::Black,
        }
    }
}

/// Which side of its parent a new node hangs from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ComingFrom {
    Left,
    Right,
}

/// A link to a node; `None` is the tree's NIL.
pub(crate) type NodePtr<K> = Option<NonNull<Node<K>>>;

/// Accessors that treat `None` as the black sentinel. Reads on `None` yield
/// `None`/black and writes on `None` do nothing, so NIL can never turn red.
pub(crate) trait NodePtrExt {
    type Key;

    fn color(&self) -> Color;
    fn is_black(&self) -> bool;
    fn is_red(&self) -> bool;
    fn left(&self) -> NodePtr<Self::Key>;
    fn parent(&self) -> NodePtr<Self::Key>;
    fn right(&self) -> NodePtr<Self::Key>;
    fn set_color(&self, color: Color);
    fn set_left(&self, left: NodePtr<Self::Key>);
    fn set_parent(&self, parent: NodePtr<Self::Key>);
    fn set_parent_and_color(&self, parent: NodePtr<Self::Key>, color: Color);
    fn set_right(&self, right: NodePtr<Self::Key>);
}

impl<K> NodePtrExt for NodePtr<K> {
    type Key = K;

    #[inline(always)]
    fn color(&self) -> Color {
        self.map_or(Color::Black, |v| unsafe { v.as_ref() }.color())
    }

    #[inline(always)]
    fn is_black(&self) -> bool {
        self.map_or(true, |v| unsafe { v.as_ref() }.is_black())
    }

    #[inline(always)]
    fn is_red(&self) -> bool {
        self.map_or(false, |v| unsafe { v.as_ref() }.is_red())
    }

    #[inline(always)]
    fn left(&self) -> NodePtr<Self::Key> {
        self.and_then(|v| unsafe { v.as_ref() }.left)
    }

    #[inline(always)]
    fn parent(&self) -> NodePtr<Self::Key> {
        self.and_then(|v| unsafe { v.as_ref() }.parent())
    }

    #[inline(always)]
    fn right(&self) -> NodePtr<Self::Key> {
        self.and_then(|v| unsafe { v.as_ref() }.right)
    }

    #[inline(always)]
    fn set_color(&self, color: Color) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.set_color(color);
        }
    }

    #[inline(always)]
    fn set_left(&self, left: NodePtr<Self::Key>) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.left = left;
        }
    }

    #[inline(always)]
    fn set_parent(&self, parent: NodePtr<Self::Key>) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.set_parent(parent);
        }
    }

    #[inline(always)]
    fn set_parent_and_color(&self, parent: NodePtr<Self::Key>, color: Color) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.set_parent_and_color(parent, color);
        }
    }

    #[inline(always)]
    fn set_right(&self, right: NodePtr<Self::Key>) {
        if let Some(mut node) = *self {
            unsafe { node.as_mut() }.right = right;
        }
    }
}

impl<K> From<&Node<K>> for NodePtr<K> {
    fn from(node: &Node<K>) -> Self {
        NonNull::new(node as *const _ as *mut _)
    }
}

impl<K> From<&mut Node<K>> for NodePtr<K> {
    fn from(node: &mut Node<K>) -> Self {
        NonNull::new(node as *mut _)
    }
}

#[repr(C)]
pub(crate) struct Node<K> {
    // The parent pointer with color information in the lowest bit
    pub(crate) parent_color: *mut Node<K>,
    // Child pointers, these own the subtrees.
    pub(crate) right: NodePtr<K>,
    pub(crate) left: NodePtr<K>,
    pub(crate) key: K,
}

/// The balancing engine: rotations, transplant and both fixups. It only
/// rewires nodes, allocation and key comparison are left to [`Tree`].
pub(crate) struct Root<K> {
    pub(crate) root: NodePtr<K>,
}

/// An ordered set of unique keys.
///
/// All lookups are O(log n). The tree is not synchronized; share it behind a
/// single lock.
pub struct Tree<K> {
    pub(crate) root: Root<K>,
    pub(crate) len: usize,
    _owns: PhantomData<Box<Node<K>>>,
}
