use std::ptr::NonNull;

use log::trace;

use super::{Color, ComingFrom, Node, NodePtr, NodePtrExt, Root};

impl<K> Default for Root<K> {
    fn default() -> Self {
        Root::new()
    }
}

// Public
impl<K> Root<K> {
    pub(crate) const fn new() -> Self {
        Root { root: None }
    }

    pub(crate) fn first(&self) -> NodePtr<K> {
        self.root.map(Node::leftmost)
    }

    pub(crate) fn last(&self) -> NodePtr<K> {
        self.root.map(Node::rightmost)
    }

    /// Hangs a fresh red `node` below `parent`, or makes it the root when
    /// `parent` is `None`. The caller runs [`Root::insert_fixup`] next.
    pub(crate) fn link(&mut self, node: NonNull<Node<K>>, parent: NodePtr<K>, from: ComingFrom) {
        let node: NodePtr<K> = Some(node);
        node.set_parent_and_color(parent, Color::Red);
        node.set_left(None);
        node.set_right(None);
        match (parent, from) {
            (None, _) => self.root = node,
            (parent, ComingFrom::Left) => parent.set_left(node),
            (parent, ComingFrom::Right) => parent.set_right(node),
        }
    }

    /// Restores the red-black properties after [`Root::link`].
    pub(crate) fn insert_fixup(&mut self, node: NonNull<Node<K>>) {
        let mut node: NodePtr<K> = Some(node);

        loop {
            /*
             * Loop invariant: node is red.
             */
            let mut parent = node.parent();
            if parent.is_none() {
                /*
                 * The inserted node is root. Either this is the
                 * first node, or we recursed at Case 1 below and
                 * are no longer violating 3).
                 */
                node.set_color(Color::Black);
                break;
            }

            /*
             * If there is a black parent, we are done.
             * Otherwise, take some corrective action as,
             * per 3), we don't want two consecutive red nodes.
             * A red parent is never the root, so gparent exists.
             */
            if parent.is_black() {
                break;
            }

            let gparent = parent.parent();
            if parent == gparent.left() {
                let uncle = gparent.right();
                if uncle.is_red() {
                    /*
                     * Case 1 - node's uncle is red (color flips).
                     *
                     *       G            g
                     *      / \          / \
                     *     p   u  -->   P   U
                     *    /            /
                     *   n            n
                     *
                     * However, since g's parent might be red, and
                     * 3) does not allow this, we need to recurse
                     * at g.
                     */
                    trace!("insert_fixup: case 1, uncle is red");
                    parent.set_color(Color::Black);
                    uncle.set_color(Color::Black);
                    gparent.set_color(Color::Red);
                    node = gparent;
                    continue;
                }

                if node == parent.right() {
                    /*
                     * Case 2 - node's uncle is black and node is
                     * the parent's right child (left rotate at parent).
                     *
                     *      G             G
                     *     / \           / \
                     *    p   U  -->    n   U
                     *     \           /
                     *      n         p
                     *
                     * This still leaves us in violation of 3), the
                     * continuation into Case 3 will fix that.
                     */
                    trace!("insert_fixup: case 2, inner grandchild");
                    node = parent;
                    self.rotate_left(node);
                    parent = node.parent();
                }

                /*
                 * Case 3 - node's uncle is black and node is
                 * the parent's left child (right rotate at gparent).
                 *
                 *        G           P
                 *       / \         / \
                 *      p   U  -->  n   g
                 *     /                 \
                 *    n                   U
                 */
                trace!("insert_fixup: case 3, outer grandchild");
                parent.set_color(Color::Black);
                gparent.set_color(Color::Red);
                self.rotate_right(gparent);
                break;
            } else {
                let uncle = gparent.left();
                if uncle.is_red() {
                    /* Case 1 - color flips */
                    trace!("insert_fixup: case 1, uncle is red");
                    parent.set_color(Color::Black);
                    uncle.set_color(Color::Black);
                    gparent.set_color(Color::Red);
                    node = gparent;
                    continue;
                }

                if node == parent.left() {
                    /* Case 2 - right rotate at parent */
                    trace!("insert_fixup: case 2, inner grandchild");
                    node = parent;
                    self.rotate_right(node);
                    parent = node.parent();
                }

                /* Case 3 - left rotate at gparent */
                trace!("insert_fixup: case 3, outer grandchild");
                parent.set_color(Color::Black);
                gparent.set_color(Color::Red);
                self.rotate_left(gparent);
                break;
            }
        }

        self.root.set_color(Color::Black);
    }

    /// Unlinks `node` and rebalances. The node itself is left untouched for
    /// the caller to free.
    pub(crate) fn erase(&mut self, node: NonNull<Node<K>>) {
        let node: NodePtr<K> = Some(node);
        let mut spliced_color = node.color();
        let child;
        let parent;

        if node.left().is_none() {
            /*
             * Case 1: node to erase has no more than 1 child (easy!)
             *
             *    (n)          (c)
             *      \    ->
             *      (c)
             */
            child = node.right();
            parent = node.parent();
            self.transplant(node, child);
        } else if node.right().is_none() {
            /* Still case 1, but this time the child is node->left */
            child = node.left();
            parent = node.parent();
            self.transplant(node, child);
        } else {
            let successor = node.right().map(Node::leftmost);
            spliced_color = successor.color();
            child = successor.right();

            if successor.parent() == node {
                /*
                 * Case 2: node's successor is its right child
                 *
                 *    (n)          (s)
                 *    / \          / \
                 *  (x) (s)  ->  (x) (c)
                 *        \
                 *        (c)
                 */
                parent = successor;
            } else {
                /*
                 * Case 3: node's successor is leftmost under
                 * node's right child subtree
                 *
                 *    (n)          (s)
                 *    / \          / \
                 *  (x) (y)  ->  (x) (y)
                 *      /            /
                 *    (p)          (p)
                 *    /            /
                 *  (s)          (c)
                 *    \
                 *    (c)
                 */
                parent = successor.parent();
                self.transplant(successor, child);
                let right = node.right();
                successor.set_right(right);
                right.set_parent(successor);
            }

            self.transplant(node, successor);
            let left = node.left();
            successor.set_left(left);
            left.set_parent(successor);
            successor.set_color(node.color());
        }

        /*
         * Removing a red node never changes a black height. Removing a
         * black one leaves every path through `child` one black short.
         */
        if spliced_color == Color::Black {
            self.erase_fixup(child, parent);
        }
    }
}

// Private
impl<K> Root<K> {
    /// Repairs the black-height deficit at `node`. `node` may be NIL, hence
    /// its `parent` is tracked alongside it.
    fn erase_fixup(&mut self, mut node: NodePtr<K>, mut parent: NodePtr<K>) {
        while node != self.root && node.is_black() {
            /*
             * Loop invariants:
             * - node is black (or NIL)
             * - node is not the root (parent is not NIL)
             * - All leaf paths going through parent and node have a
             *   black node count that is 1 lower than other leaf paths,
             *   so the sibling is never NIL.
             */
            if node == parent.left() {
                let mut sibling = parent.right();
                if sibling.is_red() {
                    /*
                     * Case 1 - left rotate at parent
                     *
                     *     P               S
                     *    / \             / \
                     *   N   s    -->    p   Sr
                     *      / \         / \
                     *     Sl  Sr      N   Sl
                     */
                    trace!("erase_fixup: case 1, sibling is red");
                    sibling.set_color(Color::Black);
                    parent.set_color(Color::Red);
                    self.rotate_left(parent);
                    sibling = parent.right();
                }

                if sibling.left().is_black() && sibling.right().is_black() {
                    /*
                     * Case 2 - sibling color flip
                     * (p could be either color here)
                     *
                     *    (p)           (p)
                     *    / \           / \
                     *   N   S    -->  N   s
                     *      / \           / \
                     *     Sl  Sr        Sl  Sr
                     *
                     * This leaves p one black short, which is fixed
                     * by painting it black if it was red, or by
                     * recursing at p.
                     */
                    trace!("erase_fixup: case 2, sibling has black children");
                    sibling.set_color(Color::Red);
                    node = parent;
                    parent = node.parent();
                    continue;
                }

                if sibling.right().is_black() {
                    /*
                     * Case 3 - right rotate at sibling
                     *
                     *   (p)           (p)
                     *   / \           / \
                     *  N   S    -->  N   Sl
                     *     / \             \
                     *    sl  Sr            s
                     *                       \
                     *                        Sr
                     */
                    trace!("erase_fixup: case 3, sibling's far child is black");
                    sibling.left().set_color(Color::Black);
                    sibling.set_color(Color::Red);
                    self.rotate_right(sibling);
                    sibling = parent.right();
                }

                /*
                 * Case 4 - left rotate at parent + color flips
                 * (p and sl could be either color here.
                 *  After rotation, p becomes black, s acquires
                 *  p's color, and sl keeps its color)
                 *
                 *      (p)             (s)
                 *      / \             / \
                 *     N   S     -->   P   Sr
                 *        / \         / \
                 *      (sl) sr      N  (sl)
                 */
                trace!("erase_fixup: case 4, sibling's far child is red");
                sibling.set_color(parent.color());
                parent.set_color(Color::Black);
                sibling.right().set_color(Color::Black);
                self.rotate_left(parent);
                node = self.root;
                break;
            } else {
                let mut sibling = parent.left();
                if sibling.is_red() {
                    /* Case 1 - right rotate at parent */
                    trace!("erase_fixup: case 1, sibling is red");
                    sibling.set_color(Color::Black);
                    parent.set_color(Color::Red);
                    self.rotate_right(parent);
                    sibling = parent.left();
                }

                if sibling.left().is_black() && sibling.right().is_black() {
                    /* Case 2 - sibling color flip */
                    trace!("erase_fixup: case 2, sibling has black children");
                    sibling.set_color(Color::Red);
                    node = parent;
                    parent = node.parent();
                    continue;
                }

                if sibling.left().is_black() {
                    /* Case 3 - left rotate at sibling */
                    trace!("erase_fixup: case 3, sibling's far child is black");
                    sibling.right().set_color(Color::Black);
                    sibling.set_color(Color::Red);
                    self.rotate_left(sibling);
                    sibling = parent.left();
                }

                /* Case 4 - right rotate at parent + color flips */
                trace!("erase_fixup: case 4, sibling's far child is red");
                sibling.set_color(parent.color());
                parent.set_color(Color::Black);
                sibling.left().set_color(Color::Black);
                self.rotate_right(parent);
                node = self.root;
                break;
            }
        }

        node.set_color(Color::Black);
    }
}

impl<K> Root<K> {
    /// Points `parent`'s link to `old` (or the root, without a parent) at
    /// `new`.
    fn change_child(&mut self, old: NodePtr<K>, new: NodePtr<K>, parent: NodePtr<K>) {
        if parent.is_none() {
            self.root = new;
        } else if parent.left() == old {
            parent.set_left(new);
        } else {
            parent.set_right(new);
        }
    }

    /// Puts the subtree `new` where `old` hangs. `old`'s own links are left
    /// as they were.
    pub(crate) fn transplant(&mut self, old: NodePtr<K>, new: NodePtr<K>) {
        let parent = old.parent();
        self.change_child(old, new, parent);
        new.set_parent(parent);
    }

    /// ```text
    ///     x              y
    ///    / \            / \
    ///   a   y    -->   x   c
    ///      / \        / \
    ///     b   c      a   b
    /// ```
    ///
    /// `x` must have a right child. Colors are untouched.
    pub(crate) fn rotate_left(&mut self, x: NodePtr<K>) {
        let y = x.right();
        debug_assert!(y.is_some(), "rotate_left without a right child");
        // Going on would transplant NIL into this node's slot.
        if y.is_none() {
            return;
        }
        trace!("rotate_left");

        let inner = y.left();
        x.set_right(inner);
        inner.set_parent(x);

        self.transplant(x, y);

        y.set_left(x);
        x.set_parent(y);
    }

    /// The mirror of [`Root::rotate_left`]; `y` must have a left child.
    pub(crate) fn rotate_right(&mut self, y: NodePtr<K>) {
        let x = y.left();
        debug_assert!(x.is_some(), "rotate_right without a left child");
        // Going on would transplant NIL into this node's slot.
        if x.is_none() {
            return;
        }
        trace!("rotate_right");

        let inner = x.right();
        y.set_left(inner);
        inner.set_parent(y);

        self.transplant(y, x);

        x.set_right(y);
        y.set_parent(x);
    }
}
