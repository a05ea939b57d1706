use std::ptr::NonNull;

use crate::Node;

/// Allocates a red, unlinked node. Allocation failure aborts before any link
/// of the tree is touched.
///
/// It leaks; pair with [`own_back`].
pub(crate) fn alloc_node<K>(key: K) -> NonNull<Node<K>> {
    NonNull::from(Box::leak(Box::new(Node::new(key))))
}

/// # Safety
///
/// `node` must come from [`alloc_node`], be unlinked from every tree, and not
/// be owned back twice.
pub(crate) unsafe fn own_back<K>(node: NonNull<Node<K>>) -> Box<Node<K>> {
    unsafe { Box::from_raw(node.as_ptr()) }
}
