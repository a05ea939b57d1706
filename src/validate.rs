use std::fmt;

use crate::{Node, NodePtr, NodePtrExt, Tree};

/// The first red-black or search-tree rule a [`Tree`] was found breaking.
///
/// Depths count edges from the root, which sits at depth 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The root is red.
    RedRoot,

    /// A red node at the given depth has a red child.
    RedChildOfRed { depth: usize },

    /// A path reaches NIL with a different number of black nodes than the
    /// first path did.
    BlackHeightMismatch { expected: usize, found: usize },

    /// The key at the given depth is not greater than its in-order
    /// predecessor.
    OutOfOrder { depth: usize },

    /// The node at the given depth does not point back at its parent.
    BrokenParentLink { depth: usize },

    /// The number of reachable nodes disagrees with the recorded length.
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Violation::RedRoot => write!(fmt, "the root is red"),
            Violation::RedChildOfRed { depth } => {
                write!(fmt, "red node at depth {depth} has a red child")
            }
            Violation::BlackHeightMismatch { expected, found } => write!(
                fmt,
                "black height mismatch: expected {expected} black nodes on every path, found {found}"
            ),
            Violation::OutOfOrder { depth } => {
                write!(fmt, "key at depth {depth} is out of order")
            }
            Violation::BrokenParentLink { depth } => {
                write!(fmt, "node at depth {depth} has a wrong parent link")
            }
            Violation::LengthMismatch { expected, found } => {
                write!(fmt, "expected {expected} nodes, found {found}")
            }
        }
    }
}

impl std::error::Error for Violation {}

/// State carried across one in-order walk.
struct Audit<'a, K> {
    black_height: Option<usize>,
    count: usize,
    prev: Option<&'a K>,
}

impl<'a, K: Ord> Audit<'a, K> {
    fn walk(
        &mut self,
        node: NodePtr<K>,
        parent: NodePtr<K>,
        blacks: usize,
        depth: usize,
    ) -> Result<(), Violation> {
        let Some(current) = node else {
            // NIL: the first one fixes the black height for all others.
            return match self.black_height {
                None => {
                    self.black_height = Some(blacks);
                    Ok(())
                }
                Some(expected) if expected != blacks => Err(Violation::BlackHeightMismatch {
                    expected,
                    found: blacks,
                }),
                Some(_) => Ok(()),
            };
        };
        // SAFETY: the tree is borrowed for 'a and owns every reachable node.
        let current: &'a Node<K> = unsafe { &*current.as_ptr() };

        if current.parent() != parent {
            return Err(Violation::BrokenParentLink { depth });
        }
        if current.is_red() && (current.left.is_red() || current.right.is_red()) {
            return Err(Violation::RedChildOfRed { depth });
        }

        let blacks = blacks + usize::from(current.is_black());
        self.walk(current.left, node, blacks, depth + 1)?;

        if self.prev.is_some_and(|prev| *prev >= current.key) {
            return Err(Violation::OutOfOrder { depth });
        }
        self.prev = Some(&current.key);
        self.count += 1;

        self.walk(current.right, node, blacks, depth + 1)
    }
}

impl<K: Ord> Tree<K> {
    /// Re-derives every invariant from the nodes alone: a black root, no red
    /// node with a red child, equal black counts on all root-to-NIL paths,
    /// strictly ascending keys, consistent parent links and length.
    ///
    /// O(n); meant for tests and audits, not for every operation.
    pub fn validate(&self) -> Result<(), Violation> {
        let root = self.root.root;
        if root.is_red() {
            return Err(Violation::RedRoot);
        }

        let mut audit = Audit {
            black_height: None,
            count: 0,
            prev: None,
        };
        audit.walk(root, None, 0, 0)?;

        if audit.count != self.len {
            return Err(Violation::LengthMismatch {
                expected: self.len,
                found: audit.count,
            });
        }
        Ok(())
    }

    pub fn is_valid_rb_tree(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Color;
    use pretty_assertions::assert_eq;

    fn sample() -> Tree<u32> {
        [7, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13].into_iter().collect()
    }

    /// Finds the node holding `key` for in-place corruption.
    fn at(tree: &Tree<u32>, key: u32) -> NodePtr<u32> {
        tree.find(&key)
    }

    #[test]
    fn empty_is_valid() {
        assert_eq!(Ok(()), Tree::<u32>::new().validate());
    }

    #[test]
    fn sample_is_valid() {
        assert_eq!(Ok(()), sample().validate());
    }

    #[test]
    fn red_root_is_rejected() {
        let tree = sample();
        tree.root.root.set_color(Color::Red);
        assert_eq!(Err(Violation::RedRoot), tree.validate());
        assert_eq!(false, tree.is_valid_rb_tree());
    }

    //            10
    //          /    \
    //        7r      18r
    //       /  \    /    \
    //      3    8  11     22
    //     / \       \      \
    //    2r  6r     13r    26r
    #[test]
    fn sample_shape() {
        let tree = sample();
        let shape = tree
            .nodes()
            .iter()
            .map(|n| (*n.key, n.color))
            .collect::<Vec<_>>();
        assert_eq!(
            vec![
                (10, Color::Black),
                (7, Color::Red),
                (3, Color::Black),
                (2, Color::Red),
                (6, Color::Red),
                (8, Color::Black),
                (18, Color::Red),
                (11, Color::Black),
                (13, Color::Red),
                (22, Color::Black),
                (26, Color::Red),
            ],
            shape
        );
    }

    #[test]
    fn red_red_edge_is_rejected() {
        let tree = sample();
        at(&tree, 3).set_color(Color::Red);
        assert_eq!(Err(Violation::RedChildOfRed { depth: 1 }), tree.validate());
    }

    #[test]
    fn unequal_black_height_is_rejected() {
        let tree = sample();
        at(&tree, 13).set_color(Color::Black);
        assert_eq!(
            Err(Violation::BlackHeightMismatch {
                expected: 2,
                found: 3
            }),
            tree.validate()
        );
    }

    #[test]
    fn black_height_mismatch_on_short_path() {
        // 2 over 1 and 3, 4 red under 3, once 4 recolored its uncle.
        let tree: Tree<u32> = [2, 1, 3, 4].into_iter().collect();
        assert_eq!(Ok(()), tree.validate());
        at(&tree, 1).set_color(Color::Red);
        assert_eq!(
            Err(Violation::BlackHeightMismatch {
                expected: 1,
                found: 2
            }),
            tree.validate()
        );
    }

    #[test]
    fn out_of_order_key_is_rejected() {
        let tree = sample();
        if let Some(mut node) = at(&tree, 6) {
            unsafe { node.as_mut() }.key = 1;
        }
        assert_eq!(Err(Violation::OutOfOrder { depth: 3 }), tree.validate());
    }

    #[test]
    fn broken_parent_link_is_rejected() {
        let tree = sample();
        at(&tree, 13).set_parent(at(&tree, 22));
        assert_eq!(Err(Violation::BrokenParentLink { depth: 3 }), tree.validate());
        // Drop walks parent links; put the real one back.
        at(&tree, 13).set_parent(at(&tree, 11));
        assert_eq!(Ok(()), tree.validate());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut tree = sample();
        tree.len += 1;
        assert_eq!(
            Err(Violation::LengthMismatch {
                expected: 12,
                found: 11
            }),
            tree.validate()
        );
        tree.len -= 1;
    }

    #[test]
    fn violations_display() {
        assert_eq!("the root is red", Violation::RedRoot.to_string());
        assert_eq!(
            "black height mismatch: expected 2 black nodes on every path, found 1",
            Violation::BlackHeightMismatch {
                expected: 2,
                found: 1
            }
            .to_string()
        );
    }
}
