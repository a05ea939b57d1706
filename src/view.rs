use crate::{Color, NodePtr, Tree};

/// A read-only snapshot of one node: its key, color and the keys it links to.
///
/// Hosts that draw or serialize the tree build their own layout from these;
/// nothing about layout is stored in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView<'a, K> {
    pub key: &'a K,
    pub color: Color,
    pub left: Option<&'a K>,
    pub right: Option<&'a K>,
    pub parent: Option<&'a K>,
}

fn key_of<'a, K>(node: NodePtr<K>) -> Option<&'a K> {
    // SAFETY: callers only pass links of a tree borrowed for 'a.
    node.map(|n| unsafe { &(*n.as_ptr()).key })
}

impl<K> Tree<K> {
    /// Every node, in pre-order (node, then its left subtree, then its right
    /// subtree).
    pub fn nodes(&self) -> Vec<NodeView<'_, K>> {
        let mut nodes = Vec::with_capacity(self.len);
        let mut stack: Vec<_> = self.root.root.into_iter().collect();
        while let Some(node) = stack.pop() {
            let node = unsafe { &*node.as_ptr() };
            nodes.push(NodeView {
                key: &node.key,
                color: node.color(),
                left: key_of(node.left),
                right: key_of(node.right),
                parent: key_of(node.parent()),
            });
            stack.extend(node.right);
            stack.extend(node.left);
        }
        nodes
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_tree_has_no_nodes() {
        assert_eq!(0, Tree::<u32>::new().nodes().len());
    }

    #[test]
    fn links_are_reported_by_key() {
        let tree: Tree<u32> = [2, 1, 3].into_iter().collect();
        assert_eq!(
            vec![
                NodeView {
                    key: &2,
                    color: Color::Black,
                    left: Some(&1),
                    right: Some(&3),
                    parent: None,
                },
                NodeView {
                    key: &1,
                    color: Color::Red,
                    left: None,
                    right: None,
                    parent: Some(&2),
                },
                NodeView {
                    key: &3,
                    color: Color::Red,
                    left: None,
                    right: None,
                    parent: Some(&2),
                },
            ],
            tree.nodes()
        );
    }

    #[test]
    fn snapshot_covers_every_node() {
        let tree: Tree<u32> = (0..100).collect();
        let nodes = tree.nodes();
        assert_eq!(tree.len(), nodes.len());
        assert_eq!(Some(nodes[0].key), tree.root());
        let mut keys = nodes.iter().map(|n| *n.key).collect::<Vec<_>>();
        keys.sort();
        assert_eq!((0..100).collect::<Vec<_>>(), keys);
        for node in &nodes[1..] {
            assert!(node.parent.is_some());
        }
    }
}
