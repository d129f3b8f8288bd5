use core::fmt;
use core::iter::FusedIterator;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`].
    ///
    /// [`Red`]: Color::Red
    #[must_use]
    pub fn is_red(&self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` if the color is [`Black`].
    ///
    /// [`Black`]: Color::Black
    #[must_use]
    pub fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }
}

/// Handle to a node slot of a [`RedBlackTree`].
///
/// Handles are only meaningful for the tree that produced them and only until
/// the node they point to is removed. [`NodeId::SENTINEL`] stands in for every
/// missing child and for the parent of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const SENTINEL: NodeId = NodeId(0);

    #[inline]
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

#[derive(Clone)]
struct Node<K> {
    // `None` only for the sentinel and for vacant slots on the free list
    key: Option<K>,
    color: Color,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
}

impl<K> Node<K> {
    fn sentinel() -> Self {
        Self {
            key: None,
            color: Color::Black,
            parent: NodeId::SENTINEL,
            left: NodeId::SENTINEL,
            right: NodeId::SENTINEL,
        }
    }
}

/// A red-black tree based ordered set.
///
/// Nodes are stored in an arena and linked by index. Slot 0 is the shared
/// sentinel which every missing child (and the parent of the root) points to,
/// so boundary checks compare against [`NodeId::SENTINEL`] instead of
/// branching on `Option`.
///
/// Keys are unique: inserting a key that is already present leaves the tree
/// untouched.
#[derive(Clone)]
pub struct RedBlackTree<K> {
    // INVARIANTS:
    //  * `nodes[0]` is the sentinel, it is black and has no key whenever no
    //    public method is running
    //  * every slot in `free` has `key == None`
    //  * `root == SENTINEL` iff `len == 0`
    nodes: Vec<Node<K>>,
    free: Vec<NodeId>,
    root: NodeId,
    len: usize,
}

impl<K> Default for RedBlackTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for RedBlackTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct TreeDebug<'a, K> {
            tree: &'a RedBlackTree<K>,
        }

        impl<K> fmt::Debug for TreeDebug<'_, K>
        where
            K: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let tree = self.tree;
                let mut f = f.debug_list();
                let mut node = tree.minimum(tree.root);
                while !node.is_sentinel() {
                    f.entry(&(tree.key_of(node), tree.color(node)));
                    node = tree.successor(node);
                }
                f.finish()
            }
        }

        f.debug_struct("RedBlackTree")
            .field("len", &self.len)
            .field("root", &self.key(self.root))
            .field("nodes", &TreeDebug { tree: self })
            .finish()
    }
}

impl<K> RedBlackTree<K> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            root: NodeId::SENTINEL,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn sentinel(&self) -> NodeId {
        NodeId::SENTINEL
    }

    /// Returns the key stored at `node`, `None` for the sentinel.
    #[inline]
    pub fn key(&self, node: NodeId) -> Option<&K> {
        self.nodes.get(node.0).and_then(|n| n.key.as_ref())
    }

    // Stale handles (removed nodes, or slots dropped by `clear`) read as the
    // sentinel in every accessor below.

    #[inline]
    pub fn color(&self, node: NodeId) -> Color {
        self.nodes.get(node.0).map_or(Color::Black, |n| n.color)
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> NodeId {
        self.nodes.get(node.0).map_or(NodeId::SENTINEL, |n| n.parent)
    }

    #[inline]
    pub fn left(&self, node: NodeId) -> NodeId {
        self.nodes.get(node.0).map_or(NodeId::SENTINEL, |n| n.left)
    }

    #[inline]
    pub fn right(&self, node: NodeId) -> NodeId {
        self.nodes.get(node.0).map_or(NodeId::SENTINEL, |n| n.right)
    }

    #[inline]
    fn set_color(&mut self, node: NodeId, color: Color) {
        self.nodes[node.0].color = color;
    }

    #[inline]
    fn set_parent(&mut self, node: NodeId, parent: NodeId) {
        self.nodes[node.0].parent = parent;
    }

    #[inline]
    fn set_left(&mut self, node: NodeId, left: NodeId) {
        self.nodes[node.0].left = left;
    }

    #[inline]
    fn set_right(&mut self, node: NodeId, right: NodeId) {
        self.nodes[node.0].right = right;
    }

    #[inline]
    fn key_of(&self, node: NodeId) -> &K {
        self.nodes[node.0]
            .key
            .as_ref()
            .expect("only the sentinel and vacant slots have no key")
    }

    fn alloc(&mut self, key: K) -> NodeId {
        // new nodes are always red leaves
        let node = Node {
            key: Some(key),
            color: Color::Red,
            parent: NodeId::SENTINEL,
            left: NodeId::SENTINEL,
            right: NodeId::SENTINEL,
        };

        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> K {
        let node = mem::replace(&mut self.nodes[id.0], Node::sentinel());
        self.free.push(id);
        node.key.expect("released node must hold a key")
    }

    /// Removes every node. The sentinel survives, so the tree can be reused.
    pub fn clear(&mut self) {
        // dropping the slots drops every stored key exactly once
        self.nodes.truncate(1);
        self.nodes[0] = Node::sentinel();
        self.free.clear();
        self.root = NodeId::SENTINEL;
        self.len = 0;
    }

    /// Number of nodes on the longest root to leaf path, 0 for an empty tree.
    pub fn height(&self) -> usize {
        fn inner<K>(tree: &RedBlackTree<K>, node: NodeId) -> usize {
            if node.is_sentinel() {
                return 0;
            }
            1 + inner(tree, tree.left(node)).max(inner(tree, tree.right(node)))
        }

        inner(self, self.root)
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            next: self.minimum(self.root),
            remaining: self.len,
        }
    }

    pub fn inorder_for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K),
    {
        for key in self.iter() {
            f(key);
        }
    }

    /// Looks for `key` in the subtree rooted at `subtree_root`.
    ///
    /// Returns the sentinel if the key is not there, never panics for a
    /// sentinel `subtree_root`.
    pub fn search<Q>(&self, subtree_root: NodeId, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut x = subtree_root;
        while !x.is_sentinel() {
            match key.cmp(self.key_of(x).borrow()) {
                Ordering::Less => x = self.left(x),
                Ordering::Equal => return x,
                Ordering::Greater => x = self.right(x),
            }
        }

        x
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        !self.search(self.root, key).is_sentinel()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.key(self.search(self.root, key))
    }

    /// Leftmost node of the subtree. Sentinel in, sentinel out.
    pub fn minimum(&self, subtree_root: NodeId) -> NodeId {
        let mut x = subtree_root;
        if x.is_sentinel() {
            return x;
        }
        while !self.left(x).is_sentinel() {
            x = self.left(x);
        }

        x
    }

    /// Rightmost node of the subtree. Sentinel in, sentinel out.
    pub fn maximum(&self, subtree_root: NodeId) -> NodeId {
        let mut x = subtree_root;
        if x.is_sentinel() {
            return x;
        }
        while !self.right(x).is_sentinel() {
            x = self.right(x);
        }

        x
    }

    pub fn min(&self) -> Option<&K> {
        self.key(self.minimum(self.root))
    }

    pub fn max(&self) -> Option<&K> {
        self.key(self.maximum(self.root))
    }

    pub fn successor(&self, mut node: NodeId) -> NodeId {
        //       +---------- 34 ---------+
        //       |                       |
        // +---- 2 ----+                 58 ----+
        // |           |                        |
        // 1      +--- 9 ----+              +-- 77 --+
        //        |          |              |        |
        //     +- 6       +- 20 -+      +- 71 -+     82
        //     |          |      |      |      |
        //     5         12 -+   24    67      75
        //                   |
        //                   13
        if node.is_sentinel() {
            return node;
        }

        let right = self.right(node);
        if !right.is_sentinel() {
            // 9 -> 12, 2 -> 5, 58 -> 67 ...
            // Everything in the right subtree is larger than node but smaller
            // than any larger ancestor, so the successor is its minimum.
            return self.minimum(right);
        }

        // 6 -> 9, 1 -> 2, 13 -> 20, 24 -> 34 ...
        // Move up while we are the right child. The first ancestor we reach
        // from its left side is the smallest key larger than node.
        let mut parent = self.parent(node);
        while !parent.is_sentinel() && node == self.right(parent) {
            node = parent;
            parent = self.parent(parent);
        }

        parent
    }

    pub fn predecessor(&self, mut node: NodeId) -> NodeId {
        if node.is_sentinel() {
            return node;
        }

        let left = self.left(node);
        if !left.is_sentinel() {
            // 2 -> 1, 9 -> 6, 20 -> 13, 77 -> 75
            return self.maximum(left);
        }

        // 12 -> 9, 58 -> 34, 67 -> 58
        let mut parent = self.parent(node);
        while !parent.is_sentinel() && node == self.left(parent) {
            node = parent;
            parent = self.parent(parent);
        }

        parent
    }

    fn rotate_left(&mut self, node: NodeId) {
        //    p                       p
        //    |                       |
        // +-node-+               +-right-+
        // |      |      -->      |       |
        // a  +-right-+       +-node-+    c
        //    |       |       |      |
        //    b       c       a      b
        // where a, b, c can be any subtrees
        let right = self.right(node);
        debug_assert!(!right.is_sentinel(), "rotate_left needs a right child");

        // attach b to node
        let b = self.left(right);
        self.set_right(node, b);
        if !b.is_sentinel() {
            self.set_parent(b, node);
        }

        // attach right to parent
        let parent = self.parent(node);
        self.set_parent(right, parent);
        if parent.is_sentinel() {
            self.root = right;
        } else if node == self.left(parent) {
            self.set_left(parent, right);
        } else {
            self.set_right(parent, right);
        }

        // attach node to right
        self.set_left(right, node);
        self.set_parent(node, right);
    }

    fn rotate_right(&mut self, node: NodeId) {
        //         p              p
        //         |              |
        //     +-node-+       +-left-+
        //     |      |       |      |
        // +-left-+   c  -->  a  +-node-+
        // |      |              |      |
        // a      b              b      c
        // where a, b, c can be any subtrees
        let left = self.left(node);
        debug_assert!(!left.is_sentinel(), "rotate_right needs a left child");

        // attach b to node
        let b = self.right(left);
        self.set_left(node, b);
        if !b.is_sentinel() {
            self.set_parent(b, node);
        }

        // attach left to parent
        let parent = self.parent(node);
        self.set_parent(left, parent);
        if parent.is_sentinel() {
            self.root = left;
        } else if node == self.right(parent) {
            self.set_right(parent, left);
        } else {
            self.set_left(parent, left);
        }

        // attach node to left
        self.set_right(left, node);
        self.set_parent(node, left);
    }

    /// Inserts `key`, returns `false` and leaves the tree untouched if an
    /// equal key is already present.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        // Move left/right down the tree until we hit the sentinel
        let mut parent = NodeId::SENTINEL;
        let mut x = self.root;
        let mut goes_left = false;
        while !x.is_sentinel() {
            parent = x;
            match key.cmp(self.key_of(x)) {
                Ordering::Less => {
                    goes_left = true;
                    x = self.left(x);
                }
                Ordering::Equal => return false,
                Ordering::Greater => {
                    goes_left = false;
                    x = self.right(x);
                }
            }
        }

        let new_node = self.alloc(key);
        self.set_parent(new_node, parent);
        if parent.is_sentinel() {
            self.root = new_node;
        } else if goes_left {
            self.set_left(parent, new_node);
        } else {
            self.set_right(parent, new_node);
        }

        self.len += 1;
        self.insert_fixup(new_node);
        true
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        // The only possible violation is a red node with a red parent. At the
        // first iteration that's the new node. The "red uncle" branch pushes
        // the violation two levels up, the other branch removes it and ends
        // the loop. The sentinel is black, so the loop stops at the root.
        while self.color(self.parent(node)).is_red() {
            let mut parent = self.parent(node);
            // parent is red and thus not the root, grand parent exists
            let grand_parent = self.parent(parent);
            debug_assert!(self.color(grand_parent).is_black());

            if parent == self.left(grand_parent) {
                let uncle = self.right(grand_parent);
                if self.color(uncle).is_red() {
                    //     +--- gp:b ---+               +--- gp:r ---+
                    //     |            |               |            |
                    //  + p:r +      + u:r +   -->   + p:b +      + u:b +
                    //  |     |      |     |         |     |      |     |
                    // n:r   a:b    b:b   c:b       n:r   a:b    b:b   c:b
                    //
                    // Black height is unchanged, but gp may now have a red parent.
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand_parent, Color::Red);
                    node = grand_parent;
                } else {
                    if node == self.right(parent) {
                        //       +-- gp:b --+                 +-- gp:b --+
                        //       |          |                 |          |
                        //  +-- p:r --+    u:b  -->       +- n:r --+    u:b
                        //  |         |                   |        |
                        // a:b    +- n:r -+           +- p:r -+   c:b
                        //        |       |           |       |
                        //       b:b     c:b         a:b     b:b
                        //
                        // make the inner child an outer one, then fall through
                        self.rotate_left(parent);
                        mem::swap(&mut parent, &mut node);
                    }

                    //           +-- gp:b --+            +----- p:b -----+
                    //           |          |            |               |
                    //      +-- p:r --+    u:b  -->   +- n:r -+     +- gp:r -+
                    //      |         |               |       |     |        |
                    //  +- n:r -+    c:b             a:b     b:b   c:b      u:b
                    //  |       |
                    // a:b     b:b
                    self.set_color(parent, Color::Black);
                    self.set_color(grand_parent, Color::Red);
                    self.rotate_right(grand_parent);
                }
            } else {
                // same as above with left and right switched
                let uncle = self.left(grand_parent);
                if self.color(uncle).is_red() {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand_parent, Color::Red);
                    node = grand_parent;
                } else {
                    if node == self.left(parent) {
                        self.rotate_right(parent);
                        mem::swap(&mut parent, &mut node);
                    }

                    self.set_color(parent, Color::Black);
                    self.set_color(grand_parent, Color::Red);
                    self.rotate_left(grand_parent);
                }
            }
        }

        let root = self.root;
        self.set_color(root, Color::Black);
    }

    /// Removes `key` and returns it, `None` if it wasn't present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.search(self.root, key);
        if node.is_sentinel() {
            return None;
        }

        Some(self.remove_node(node))
    }

    fn remove_node(&mut self, node: NodeId) -> K {
        //       +---------- 34 ---------+
        //       |                       |
        // +---- 2 ----+                 58 ----+
        // |           |                        |
        // 1      +--- 9 ----+              +-- 77 --+
        //        |          |              |        |
        //     +- 6       +- 20 -+      +- 71 -+     82
        //     |          |      |      |      |
        //     5         12 -+   24    67      75
        //                   |
        //                   13
        let mut removed_color = self.color(node);
        // Node that takes the structural place of the removed one. May be the
        // sentinel, in which case its parent field tells fix-up where it is.
        let replacement;

        if self.left(node).is_sentinel() {
            // at most a right child: 1, 13, 24, 58 ...
            replacement = self.right(node);
            self.transplant(node, replacement);
        } else if self.right(node).is_sentinel() {
            // only a left child: 6, 12 ...
            replacement = self.left(node);
            self.transplant(node, replacement);
        } else {
            // Two children: the successor (minimum of the right subtree, it has
            // no left child) takes node's place and color.
            let successor = self.minimum(self.right(node));
            removed_color = self.color(successor);
            replacement = self.right(successor);

            if self.parent(successor) == node {
                // 20 -> 24, 77 -> 82
                self.set_parent(replacement, successor);
            } else {
                // 9 -> 12, 34 -> 58: unlink successor first, then give it
                // node's right subtree
                self.transplant(successor, replacement);
                let right = self.right(node);
                self.set_right(successor, right);
                self.set_parent(right, successor);
            }

            self.transplant(node, successor);
            let left = self.left(node);
            self.set_left(successor, left);
            self.set_parent(left, successor);
            let color = self.color(node);
            self.set_color(successor, color);
        }

        if removed_color.is_black() {
            // every path through `replacement` is now one black short
            self.remove_fixup(replacement);
        }

        // the sentinel's parent was scratch space for fix-up
        self.nodes[NodeId::SENTINEL.0] = Node::sentinel();
        self.len -= 1;
        self.release(node)
    }

    fn remove_fixup(&mut self, mut x: NodeId) {
        // x is "doubly black". If it's red we simply color it black after the
        // loop. Otherwise the missing black is moved up or absorbed by rotation.
        while x != self.root && self.color(x).is_black() {
            let parent = self.parent(x);
            // x is black and not root, so by black height it must have a real sibling
            if x == self.left(parent) {
                let mut sibling = self.right(parent);
                debug_assert!(!sibling.is_sentinel());

                if self.color(sibling).is_red() {
                    //     +--- p:b ---+                +--- s:b ---+
                    //     |           |                |           |
                    // +- x:b -+   +- s:r -+   -->  +- p:r -+      d:b
                    // |       |   |       |        |       |
                    // a       b  c:b     d:b     x:b      c:b
                    //
                    // Turns into one of the cases below with a red parent.
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sibling = self.right(parent);
                }

                let near = self.left(sibling);
                let far = self.right(sibling);
                if self.color(near).is_black() && self.color(far).is_black() {
                    // Take one black from x and sibling and put it on the parent.
                    // If the parent was red the loop stops and it's colored black below.
                    self.set_color(sibling, Color::Red);
                    x = parent;
                } else {
                    if self.color(far).is_black() {
                        //    +--- p:c ---+                 +--- p:c ---+
                        //    |           |                 |           |
                        //   x:b      +- s:b -+   -->      x:b      +- c:b -+
                        //            |       |                     |       |
                        //           c:r     d:b                    e   +- s:r -+
                        //                                              |       |
                        //                                              f      d:b
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(parent);
                    }

                    //     +--- p:c ---+                   +--- s:c ---+
                    //     |           |                   |           |
                    //    x:b      +- s:b -+   -->     +- p:b -+      d:b
                    //             |       |           |       |
                    //             c      d:r         x:b      c
                    //
                    // Paths through x gain the missing black, we're done.
                    let parent_color = self.color(parent);
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let far = self.right(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                // same as above with left and right switched
                let mut sibling = self.left(parent);
                debug_assert!(!sibling.is_sentinel());

                if self.color(sibling).is_red() {
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sibling = self.left(parent);
                }

                let near = self.right(sibling);
                let far = self.left(sibling);
                if self.color(near).is_black() && self.color(far).is_black() {
                    self.set_color(sibling, Color::Red);
                    x = parent;
                } else {
                    if self.color(far).is_black() {
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(parent);
                    }

                    let parent_color = self.color(parent);
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let far = self.left(sibling);
                    self.set_color(far, Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }

        self.set_color(x, Color::Black);
    }

    /// Replaces subtree `old` with subtree `new` in `old`'s parent.
    ///
    /// `new.parent` is rewired even if `new` is the sentinel.
    fn transplant(&mut self, old: NodeId, new: NodeId) {
        let parent = self.parent(old);
        if parent.is_sentinel() {
            self.root = new;
        } else if old == self.left(parent) {
            self.set_left(parent, new);
        } else {
            self.set_right(parent, new);
        }
        self.set_parent(new, parent);
    }
}

impl<K: Ord> FromIterator<K> for RedBlackTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for RedBlackTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a RedBlackTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the keys of a [`RedBlackTree`].
pub struct Iter<'a, K> {
    tree: &'a RedBlackTree<K>,
    next: NodeId,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_sentinel() {
            return None;
        }

        let key = self.tree.key_of(self.next);
        self.next = self.tree.successor(self.next);
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
