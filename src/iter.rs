use std::{iter::FusedIterator, marker::PhantomData};

use crate::{Node, NodePtr, Tree};

impl<K> Tree<K> {
    /// Gets an iterator over the keys, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rougeset::Tree;
    ///
    /// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            front: self.root.first(),
            back: self.root.last(),
            len: self.len,
            _phantom: PhantomData,
        }
    }

    /// Calls `visit` on every key in ascending order. It can be called any
    /// number of times; it never mutates the tree.
    pub fn inorder<F>(&self, visit: F)
    where
        F: FnMut(&K),
    {
        self.iter().for_each(visit);
    }
}

/// An iterator over the keys of a [`Tree`], in sorted order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K> {
    front: NodePtr<K>,
    back: NodePtr<K>,
    len: usize,
    _phantom: PhantomData<&'a Node<K>>,
}

// SAFETY: an `Iter` only hands out shared references to keys.
unsafe impl<K: Sync> Send for Iter<'_, K> {}
unsafe impl<K: Sync> Sync for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter { ..*self }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: len > 0 keeps front on a live node; the borrow of the tree
        // outlives 'a.
        let current = unsafe { &*self.front?.as_ptr() };
        self.front = current.next();
        self.len -= 1;
        Some(&current.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<&'a K> {
        self.next_back()
    }
}

impl<'a, K> DoubleEndedIterator for Iter<'a, K> {
    fn next_back(&mut self) -> Option<&'a K> {
        if self.len == 0 {
            return None;
        }
        let current = unsafe { &*self.back?.as_ptr() };
        self.back = current.prev();
        self.len -= 1;
        Some(&current.key)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<K> FusedIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// An owning iterator over the keys of a [`Tree`], in sorted order.
pub struct IntoIter<K>(Tree<K>);

impl<K: Ord> IntoIterator for Tree<K> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> IntoIter<K> {
        IntoIter(self)
    }
}

impl<K: Ord> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.0.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<K: Ord> DoubleEndedIterator for IntoIter<K> {
    fn next_back(&mut self) -> Option<K> {
        self.0.pop_last()
    }
}

impl<K: Ord> ExactSizeIterator for IntoIter<K> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Ord> FusedIterator for IntoIter<K> {}

impl<K: Ord> FromIterator<K> for Tree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Tree<K> {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for Tree<K> {
    #[inline]
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |k| {
            self.insert(k);
        });
    }
}

impl<'a, K: Ord + Copy + 'a> Extend<&'a K> for Tree<K> {
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

#[cfg(test)]
mod test {
    use crate::Tree;
    use pretty_assertions::assert_eq;

    #[test]
    fn iter_empty() {
        let tree = Tree::<usize>::new();
        assert_eq!(None, tree.iter().next());
        assert_eq!(None, tree.iter().next_back());
        assert_eq!(0, tree.iter().len());
    }

    #[test]
    fn iter() {
        let mut tree = Tree::new();
        for i in 0..128 {
            tree.insert(i);
        }
        let mut iter = tree.iter();
        assert_eq!(128, iter.len());
        for i in 0..128 {
            assert_eq!(Some(&i), iter.next());
        }
        assert_eq!(None, iter.next());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn iter_rev_insert() {
        let mut tree = Tree::new();
        for i in (0..128).rev() {
            tree.insert(i);
        }
        let mut iter = tree.iter().rev();
        for i in (0..128).rev() {
            assert_eq!(Some(&i), iter.next());
        }
        assert_eq!(None, iter.next());
    }

    #[test]
    fn iter_both_ends_meet() {
        let tree: Tree<_> = (0..5).collect();
        let mut iter = tree.iter();
        assert_eq!(Some(&0), iter.next());
        assert_eq!(Some(&4), iter.next_back());
        assert_eq!(Some(&1), iter.next());
        assert_eq!(Some(&3), iter.next_back());
        assert_eq!(Some(&2), iter.next());
        assert_eq!(None, iter.next_back());
        assert_eq!(None, iter.next());
    }

    #[test]
    fn inorder_is_restartable() {
        let tree: Tree<_> = [7, 3, 18, 10, 22].into_iter().collect();
        let mut first = vec![];
        tree.inorder(|k| first.push(*k));
        let mut second = vec![];
        tree.inorder(|k| second.push(*k));
        assert_eq!(vec![3, 7, 10, 18, 22], first);
        assert_eq!(first, second);
    }

    #[test]
    fn into_iter() {
        let tree: Tree<_> = ["hundo", "zero", "forty_two"]
            .into_iter()
            .map(String::from)
            .collect();
        let vec = tree.into_iter().collect::<Vec<_>>();
        assert_eq!(vec!["forty_two", "hundo", "zero"], vec);
    }

    #[test]
    fn into_iter_rev_partial() {
        let tree: Tree<_> = (0..10).collect();
        let mut iter = tree.into_iter();
        assert_eq!(Some(9), iter.next_back());
        assert_eq!(Some(0), iter.next());
        assert_eq!(8, iter.len());
        // Dropping the iterator frees the rest.
    }

    #[test]
    fn extend() {
        let mut tree = Tree::new();
        tree.insert(100);
        tree.insert(0);
        tree.extend(vec![42, 1, 42]);
        tree.extend(&[7, 0]);

        assert_eq!(5, tree.len());
        assert_eq!(vec![0, 1, 7, 42, 100], tree.iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn for_loop() {
        let tree: Tree<_> = (0..3).collect();
        let mut seen = 0;
        for k in &tree {
            assert_eq!(seen, *k);
            seen += 1;
        }
        for k in tree {
            // This is a test for compilation.
            let _ = k;
        }
    }
}
