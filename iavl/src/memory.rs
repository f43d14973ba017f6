//! A balanced IAVL tree held entirely in memory.
//!
//! Nodes live in an arena and refer to their children by index. Children are always allocated
//! before their parents, so hashing the arena in order visits every child before its parent.

use std::marker::PhantomData;

use iavl_core::{
    hasher::NodeHasher,
    proof::{self, ExistenceProof, KeyProof, NonExistenceProof, ProveError, VerifyError},
    tree::{Cursor, InnerData, LeafData, NodeHash, NodeView, Snapshot},
};

use crate::Options;

enum Node {
    Leaf {
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Inner {
        key: Vec<u8>,
        height: u8,
        size: u64,
        left: usize,
        right: usize,
    },
}

impl Node {
    fn height(&self) -> u8 {
        match self {
            Node::Leaf { .. } => 0,
            Node::Inner { height, .. } => *height,
        }
    }

    fn size(&self) -> u64 {
        match self {
            Node::Leaf { .. } => 1,
            Node::Inner { size, .. } => *size,
        }
    }
}

/// An immutable IAVL tree built from a set of entries.
///
/// Node hashes are not computed until [`MemoryTree::commit`] is called. The proof methods commit
/// implicitly.
pub struct MemoryTree<H> {
    options: Options,
    nodes: Vec<Node>,
    hashes: Vec<Option<NodeHash>>,
    root: Option<usize>,
    _marker: PhantomData<H>,
}

impl<H: NodeHasher> MemoryTree<H> {
    /// Create an empty tree.
    pub fn new(options: Options) -> Self {
        MemoryTree {
            options,
            nodes: Vec::new(),
            hashes: Vec::new(),
            root: None,
            _marker: PhantomData,
        }
    }

    /// Build a balanced tree from the given entries. When a key appears more than once, the last
    /// value wins.
    pub fn from_entries(
        options: Options,
        entries: impl IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    ) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        // stable, so duplicates keep their insertion order.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let mut deduped: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match deduped.last_mut() {
                Some(last) if last.0 == key => last.1 = value,
                _ => deduped.push((key, value)),
            }
        }

        let mut tree = Self::new(options);
        if !deduped.is_empty() {
            let root = tree.build(deduped);
            tree.root = Some(root);
        }
        tree.hashes = vec![None; tree.nodes.len()];
        tree
    }

    // `entries` is sorted, unique and non-empty.
    fn build(&mut self, mut entries: Vec<(Vec<u8>, Vec<u8>)>) -> usize {
        if entries.len() == 1 {
            if let Some((key, value)) = entries.pop() {
                self.nodes.push(Node::Leaf { key, value });
            }
            return self.nodes.len() - 1;
        }

        let right_entries = entries.split_off(entries.len() / 2);
        let key = right_entries[0].0.clone();
        let left = self.build(entries);
        let right = self.build(right_entries);

        let (l, r) = (&self.nodes[left], &self.nodes[right]);
        let node = Node::Inner {
            key,
            height: 1 + l.height().max(r.height()),
            size: l.size() + r.size(),
            left,
            right,
        };
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Compute all outstanding node hashes and return the root hash, or `None` if the tree is
    /// empty.
    pub fn commit(&mut self) -> Option<NodeHash> {
        let mut computed = 0usize;
        for i in 0..self.nodes.len() {
            if self.hashes[i].is_some() {
                continue;
            }
            let hash = match &self.nodes[i] {
                Node::Leaf { key, value } => H::hash_leaf(&LeafData::new(key, value)),
                Node::Inner {
                    height,
                    size,
                    left,
                    right,
                    ..
                } => {
                    // children precede parents in the arena, so both are set.
                    let (Some(left), Some(right)) = (self.hashes[*left], self.hashes[*right])
                    else {
                        continue;
                    };
                    H::hash_inner(&InnerData {
                        height: *height,
                        size: *size,
                        left,
                        right,
                    })
                }
            };
            self.hashes[i] = Some(hash);
            computed += 1;
        }

        if computed > 0 {
            tracing::trace!(computed, "materialized node hashes");
        }
        self.root_hash()
    }

    /// The root hash, if the tree is non-empty and has been committed.
    pub fn root_hash(&self) -> Option<NodeHash> {
        self.root.and_then(|root| self.hashes[root])
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.lookup(key).1
    }

    /// The number of entries in the tree.
    pub fn len(&self) -> u64 {
        self.root.map_or(0, |root| self.nodes[root].size())
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The height of the tree. A single leaf, or an empty tree, has height 0.
    pub fn height(&self) -> u8 {
        self.root.map_or(0, |root| self.nodes[root].height())
    }

    /// Look up a key, returning its index in sorted order and its value. When the key is absent,
    /// the index is that of the first greater key.
    pub fn lookup(&self, key: &[u8]) -> (u64, Option<Vec<u8>>) {
        let Some(mut pos) = self.root else {
            return (0, None);
        };

        let mut index = 0;
        loop {
            match &self.nodes[pos] {
                Node::Leaf {
                    key: leaf_key,
                    value,
                } => {
                    return match key.cmp(leaf_key.as_slice()) {
                        std::cmp::Ordering::Less => (index, None),
                        std::cmp::Ordering::Equal => (index, Some(value.clone())),
                        std::cmp::Ordering::Greater => (index + 1, None),
                    }
                }
                Node::Inner {
                    key: split_key,
                    left,
                    right,
                    ..
                } => {
                    if key < split_key.as_slice() {
                        pos = *left;
                    } else {
                        index += self.nodes[*left].size();
                        pos = *right;
                    }
                }
            }
        }
    }

    /// Get the entry at the given index in sorted order.
    pub fn entry_at(&self, index: u64) -> Option<(Vec<u8>, Vec<u8>)> {
        let mut pos = self.root?;
        if index >= self.nodes[pos].size() {
            return None;
        }

        let mut index = index;
        loop {
            match &self.nodes[pos] {
                Node::Leaf { key, value } => return Some((key.clone(), value.clone())),
                Node::Inner { left, right, .. } => {
                    let left_size = self.nodes[*left].size();
                    if index < left_size {
                        pos = *left;
                    } else {
                        index -= left_size;
                        pos = *right;
                    }
                }
            }
        }
    }

    /// Get the value stored under `key` along with a proof of its existence.
    pub fn get_with_proof(
        &mut self,
        key: &[u8],
    ) -> Result<(Vec<u8>, ExistenceProof), ProveError> {
        let root = self.prepare()?;
        let (value, proof) = proof::prove_existence(&mut self.cursor(), key)?;
        tracing::debug!(
            key = %hex::encode(key),
            path_len = proof.path.steps.len(),
            "proved existence"
        );

        if self.options.self_check {
            self_check(proof.verify::<H>(key, &value, &root))?;
        }
        Ok((value, proof))
    }

    /// Prove that `key` is absent from the tree.
    pub fn prove_absence(&mut self, key: &[u8]) -> Result<NonExistenceProof, ProveError> {
        let root = self.prepare()?;
        let proof = proof::prove_non_existence(&*self, key)?;
        tracing::debug!(
            key = %hex::encode(key),
            left = proof.left_path.is_some(),
            right = proof.right_path.is_some(),
            "proved non-existence"
        );

        if self.options.self_check {
            self_check(proof.verify::<H>(key, &root))?;
        }
        Ok(proof)
    }

    /// Prove either the value of `key`, or its absence.
    pub fn prove(&mut self, key: &[u8]) -> Result<(Option<Vec<u8>>, KeyProof), ProveError> {
        let root = self.prepare()?;
        let (value, proof) = proof::prove(&*self, key)?;
        tracing::debug!(
            key = %hex::encode(key),
            existence = matches!(proof, KeyProof::Existence(_)),
            "proved key"
        );

        if self.options.self_check {
            self_check(proof.verify::<H>(key, value.as_deref(), &root))?;
        }
        Ok((value, proof))
    }

    fn prepare(&mut self) -> Result<NodeHash, ProveError> {
        let root = self.commit().ok_or(ProveError::EmptyTree)?;
        let height = self.height();
        if height > self.options.max_height {
            return Err(ProveError::HeightLimitExceeded {
                height,
                limit: self.options.max_height,
            });
        }
        Ok(root)
    }
}

fn self_check(result: Result<(), VerifyError>) -> Result<(), ProveError> {
    result.map_err(|e| {
        tracing::error!(err = %e, "constructed proof failed verification");
        ProveError::SelfCheckFailed(e)
    })
}

/// A cursor over a [`MemoryTree`].
pub struct MemoryCursor<'a, H> {
    tree: &'a MemoryTree<H>,
    pos: Option<usize>,
}

impl<'a, H> Cursor for MemoryCursor<'a, H> {
    fn rewind(&mut self) {
        self.pos = self.tree.root;
    }

    fn node(&self) -> Option<NodeView<'_>> {
        let pos = self.pos?;
        let hash = self.tree.hashes[pos];
        Some(match &self.tree.nodes[pos] {
            Node::Leaf { key, value } => NodeView::Leaf { key, value, hash },
            Node::Inner {
                key, height, size, ..
            } => NodeView::Inner {
                key,
                height: *height,
                size: *size,
                hash,
            },
        })
    }

    fn peek_children(&self) -> Option<(Option<NodeHash>, Option<NodeHash>)> {
        match &self.tree.nodes[self.pos?] {
            Node::Leaf { .. } => None,
            Node::Inner { left, right, .. } => {
                Some((self.tree.hashes[*left], self.tree.hashes[*right]))
            }
        }
    }

    fn traverse_left_child(&mut self) {
        let tree = self.tree;
        if let Some(Node::Inner { left, .. }) = self.pos.map(|pos| &tree.nodes[pos]) {
            self.pos = Some(*left);
        }
    }

    fn traverse_right_child(&mut self) {
        let tree = self.tree;
        if let Some(Node::Inner { right, .. }) = self.pos.map(|pos| &tree.nodes[pos]) {
            self.pos = Some(*right);
        }
    }
}

impl<H: NodeHasher> Snapshot for MemoryTree<H> {
    type Cursor<'a>
        = MemoryCursor<'a, H>
    where
        Self: 'a;

    fn cursor(&self) -> MemoryCursor<'_, H> {
        MemoryCursor {
            tree: self,
            pos: self.root,
        }
    }

    fn size(&self) -> u64 {
        self.len()
    }

    fn lookup(&self, key: &[u8]) -> (u64, Option<Vec<u8>>) {
        MemoryTree::lookup(self, key)
    }

    fn entry_at(&self, index: u64) -> Option<(Vec<u8>, Vec<u8>)> {
        MemoryTree::entry_at(self, index)
    }
}
