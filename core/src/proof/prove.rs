//! Construction of proofs from a live tree.
//!
//! The tree is consumed through the [`Cursor`] and [`Snapshot`] traits. All node hashes on the
//! walked paths must have been computed beforehand; construction trusts them as given and a
//! stale hash results in a proof which fails verification rather than an error here.

use crate::{
    proof::{ExistenceProof, InnerStep, KeyProof, NonExistenceProof, Path, ProveError},
    tree::{Cursor, LeafData, NodeHash, NodeView, Snapshot},
};

use alloc::vec::Vec;

/// Construct a proof that `key` is present, returning its value alongside the proof.
pub fn prove_existence<C: Cursor>(
    cursor: &mut C,
    key: &[u8],
) -> Result<(Vec<u8>, ExistenceProof), ProveError> {
    let root_hash = root_hash(cursor)?;
    let (value, path) = record_path(cursor, key)?;
    Ok((value, ExistenceProof { path, root_hash }))
}

/// Construct a proof that `key` is absent, from the paths of its predecessor and successor.
pub fn prove_non_existence<S: Snapshot>(
    snapshot: &S,
    key: &[u8],
) -> Result<NonExistenceProof, ProveError> {
    let mut cursor = snapshot.cursor();
    let root_hash = root_hash(&mut cursor)?;

    let (index, value) = snapshot.lookup(key);
    if value.is_some() {
        return Err(ProveError::KeyAlreadyExists);
    }

    let left = match index.checked_sub(1) {
        Some(left_index) => snapshot.entry_at(left_index),
        None => None,
    };
    let right = if index < snapshot.size() {
        snapshot.entry_at(index)
    } else {
        None
    };

    if left.is_none() && right.is_none() {
        return Err(ProveError::NoBounds);
    }

    let mut proof = NonExistenceProof {
        root_hash,
        left_path: None,
        left_node: None,
        right_path: None,
        right_node: None,
    };

    if let Some((key, value)) = left {
        let (_, path) = record_path(&mut cursor, &key)?;
        proof.left_path = Some(path);
        proof.left_node = Some(LeafData { key, value });
    }

    if let Some((key, value)) = right {
        let (_, path) = record_path(&mut cursor, &key)?;
        proof.right_path = Some(path);
        proof.right_node = Some(LeafData { key, value });
    }

    Ok(proof)
}

/// Construct whichever proof applies to `key`: an existence proof, returned along with the value,
/// when it is present and a non-existence proof otherwise.
pub fn prove<S: Snapshot>(
    snapshot: &S,
    key: &[u8],
) -> Result<(Option<Vec<u8>>, KeyProof), ProveError> {
    match snapshot.lookup(key) {
        (_, Some(_)) => {
            let (value, proof) = prove_existence(&mut snapshot.cursor(), key)?;
            Ok((Some(value), KeyProof::Existence(proof)))
        }
        (_, None) => {
            let proof = prove_non_existence(snapshot, key)?;
            Ok((None, KeyProof::NonExistence(proof)))
        }
    }
}

fn root_hash<C: Cursor>(cursor: &mut C) -> Result<NodeHash, ProveError> {
    cursor.rewind();
    cursor
        .node()
        .ok_or(ProveError::EmptyTree)?
        .hash()
        .ok_or(ProveError::UncomputedTree)
}

/// Record the path from the root down to the leaf holding `key`.
///
/// Steps are gathered top-down and reversed at the end, so the returned path is ordered from the
/// leaf to the root. Each descent must strictly decrease the height, which bounds the walk by
/// the height of the root.
fn record_path<C: Cursor>(cursor: &mut C, key: &[u8]) -> Result<(Vec<u8>, Path), ProveError> {
    cursor.rewind();

    let mut steps: Vec<InnerStep> = Vec::new();
    loop {
        let missing = if steps.is_empty() {
            ProveError::EmptyTree
        } else {
            ProveError::MalformedTree
        };
        let (go_left, step) = match cursor.node().ok_or(missing)? {
            NodeView::Leaf {
                key: leaf_key,
                value,
                hash,
            } => {
                if leaf_key != key {
                    return Err(ProveError::KeyNotFound);
                }
                let leaf_hash = hash.ok_or(ProveError::UncomputedTree)?;
                let value = value.to_vec();
                steps.reverse();
                return Ok((value, Path { leaf_hash, steps }));
            }
            NodeView::Inner {
                key: split_key,
                height,
                size,
                ..
            } => {
                let parent_height = steps.last().map_or(u8::MAX as u16 + 1, |s| s.height as u16);
                if height == 0 || height as u16 >= parent_height {
                    return Err(ProveError::MalformedTree);
                }

                let (left, right) = cursor.peek_children().ok_or(ProveError::MalformedTree)?;
                let go_left = key < split_key;
                let step = if go_left {
                    InnerStep {
                        height,
                        size,
                        left: None,
                        right: Some(right.ok_or(ProveError::UncomputedTree)?),
                    }
                } else {
                    InnerStep {
                        height,
                        size,
                        left: Some(left.ok_or(ProveError::UncomputedTree)?),
                        right: None,
                    }
                };
                (go_left, step)
            }
        };

        steps.push(step);
        if go_left {
            cursor.traverse_left_child();
        } else {
            cursor.traverse_right_child();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{prove, prove_existence, prove_non_existence};
    use crate::{
        hasher::{Blake3Hasher, NodeHasher},
        proof::{KeyProof, ProveError},
        tree::{Cursor, InnerData, LeafData, NodeHash, NodeView, Snapshot},
    };

    enum TestNode {
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

    // A hand-assembled tree. Node 0 is the root, when present.
    struct TestTree {
        nodes: Vec<TestNode>,
        hashes: Vec<Option<NodeHash>>,
    }

    impl TestTree {
        fn new(nodes: Vec<TestNode>) -> Self {
            let hashes = vec![None; nodes.len()];
            TestTree { nodes, hashes }
        }

        fn hash_all(&mut self) {
            // children always come after their parents.
            for i in (0..self.nodes.len()).rev() {
                let hash = match &self.nodes[i] {
                    TestNode::Leaf { key, value } => {
                        Blake3Hasher::hash_leaf(&LeafData::new(key, value))
                    }
                    TestNode::Inner {
                        height,
                        size,
                        left,
                        right,
                        ..
                    } => Blake3Hasher::hash_inner(&InnerData {
                        height: *height,
                        size: *size,
                        left: self.hashes[*left].unwrap(),
                        right: self.hashes[*right].unwrap(),
                    }),
                };
                self.hashes[i] = Some(hash);
            }
        }

        fn leaves(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
            let mut leaves: Vec<_> = self
                .nodes
                .iter()
                .filter_map(|n| match n {
                    TestNode::Leaf { key, value } => Some((key.clone(), value.clone())),
                    TestNode::Inner { .. } => None,
                })
                .collect();
            leaves.sort();
            leaves
        }
    }

    struct TestCursor<'a> {
        tree: &'a TestTree,
        pos: usize,
    }

    impl<'a> Cursor for TestCursor<'a> {
        fn rewind(&mut self) {
            self.pos = 0;
        }

        fn node(&self) -> Option<NodeView<'_>> {
            let hash = *self.tree.hashes.get(self.pos)?;
            Some(match self.tree.nodes.get(self.pos)? {
                TestNode::Leaf { key, value } => NodeView::Leaf { key, value, hash },
                TestNode::Inner {
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
            match self.tree.nodes.get(self.pos)? {
                TestNode::Leaf { .. } => None,
                TestNode::Inner { left, right, .. } => {
                    Some((self.tree.hashes[*left], self.tree.hashes[*right]))
                }
            }
        }

        fn traverse_left_child(&mut self) {
            if let Some(TestNode::Inner { left, .. }) = self.tree.nodes.get(self.pos) {
                self.pos = *left;
            }
        }

        fn traverse_right_child(&mut self) {
            if let Some(TestNode::Inner { right, .. }) = self.tree.nodes.get(self.pos) {
                self.pos = *right;
            }
        }
    }

    impl Snapshot for TestTree {
        type Cursor<'a> = TestCursor<'a>;

        fn cursor(&self) -> TestCursor<'_> {
            TestCursor { tree: self, pos: 0 }
        }

        fn size(&self) -> u64 {
            self.leaves().len() as u64
        }

        fn lookup(&self, key: &[u8]) -> (u64, Option<Vec<u8>>) {
            let leaves = self.leaves();
            match leaves.binary_search_by(|(k, _)| k.as_slice().cmp(key)) {
                Ok(i) => (i as u64, Some(leaves[i].1.clone())),
                Err(i) => (i as u64, None),
            }
        }

        fn entry_at(&self, index: u64) -> Option<(Vec<u8>, Vec<u8>)> {
            self.leaves().get(index as usize).cloned()
        }
    }

    fn leaf(key: &str, value: &str) -> TestNode {
        TestNode::Leaf {
            key: key.as_bytes().to_vec(),
            value: value.as_bytes().to_vec(),
        }
    }

    fn inner(key: &str, height: u8, size: u64, left: usize, right: usize) -> TestNode {
        TestNode::Inner {
            key: key.as_bytes().to_vec(),
            height,
            size,
            left,
            right,
        }
    }

    //        0 ("mango")
    //       /   \
    //  1 apple   2 ("pear")
    //            /   \
    //      3 mango   4 pear
    fn fruit_tree() -> TestTree {
        TestTree::new(vec![
            inner("mango", 2, 3, 1, 2),
            leaf("apple", "1"),
            inner("pear", 1, 2, 3, 4),
            leaf("mango", "2"),
            leaf("pear", "3"),
        ])
    }

    fn root(tree: &TestTree) -> NodeHash {
        tree.hashes[0].unwrap()
    }

    #[test]
    fn existence_path_is_leaf_to_root() {
        let mut tree = fruit_tree();
        tree.hash_all();

        let (value, proof) = prove_existence(&mut tree.cursor(), b"mango").unwrap();
        assert_eq!(value, b"2");
        assert_eq!(proof.root_hash, root(&tree));
        assert_eq!(proof.path.leaf_hash, tree.hashes[3].unwrap());
        assert_eq!(proof.path.steps.len(), 2);
        assert_eq!(proof.path.steps[0].height, 1);
        assert_eq!(proof.path.steps[0].right, tree.hashes[4]);
        assert_eq!(proof.path.steps[1].height, 2);
        assert_eq!(proof.path.steps[1].left, tree.hashes[1]);
        proof
            .verify::<Blake3Hasher>(b"mango", b"2", &root(&tree))
            .unwrap();
    }

    #[test]
    fn existence_of_absent_key_fails() {
        let mut tree = fruit_tree();
        tree.hash_all();
        assert_eq!(
            prove_existence(&mut tree.cursor(), b"lime").unwrap_err(),
            ProveError::KeyNotFound
        );
    }

    #[test]
    fn uncomputed_hashes_are_reported() {
        let mut tree = fruit_tree();
        assert_eq!(
            prove_existence(&mut tree.cursor(), b"mango").unwrap_err(),
            ProveError::UncomputedTree
        );

        // root computed but not a sibling on the path.
        tree.hash_all();
        tree.hashes[4] = None;
        assert_eq!(
            prove_existence(&mut tree.cursor(), b"mango").unwrap_err(),
            ProveError::UncomputedTree
        );
    }

    #[test]
    fn empty_tree_is_reported() {
        let tree = TestTree::new(Vec::new());
        assert_eq!(
            prove_existence(&mut tree.cursor(), b"a").unwrap_err(),
            ProveError::EmptyTree
        );
        assert_eq!(
            prove_non_existence(&tree, b"a").unwrap_err(),
            ProveError::EmptyTree
        );
    }

    #[test]
    fn non_increasing_heights_are_rejected() {
        let mut tree = TestTree::new(vec![
            inner("b", 1, 2, 1, 2),
            leaf("a", "1"),
            inner("c", 1, 2, 3, 4),
            leaf("b", "2"),
            leaf("c", "3"),
        ]);
        tree.hash_all();
        assert_eq!(
            prove_existence(&mut tree.cursor(), b"b").unwrap_err(),
            ProveError::MalformedTree
        );
    }

    #[test]
    fn non_existence_between_neighbors() {
        let mut tree = fruit_tree();
        tree.hash_all();

        let proof = prove_non_existence(&tree, b"lime").unwrap();
        assert_eq!(proof.left_node.as_ref().unwrap().key, b"apple");
        assert_eq!(proof.right_node.as_ref().unwrap().key, b"mango");
        proof.verify::<Blake3Hasher>(b"lime", &root(&tree)).unwrap();
    }

    #[test]
    fn non_existence_of_present_key_fails() {
        let mut tree = fruit_tree();
        tree.hash_all();
        assert_eq!(
            prove_non_existence(&tree, b"apple").unwrap_err(),
            ProveError::KeyAlreadyExists
        );
    }

    #[test]
    fn prove_dispatches_on_presence() {
        let mut tree = fruit_tree();
        tree.hash_all();

        let (value, proof) = prove(&tree, b"pear").unwrap();
        assert_eq!(value.as_deref(), Some(&b"3"[..]));
        assert!(matches!(proof, KeyProof::Existence(_)));
        proof
            .verify::<Blake3Hasher>(b"pear", value.as_deref(), &root(&tree))
            .unwrap();

        let (value, proof) = prove(&tree, b"zucchini").unwrap();
        assert_eq!(value, None);
        assert!(matches!(proof, KeyProof::NonExistence(_)));
        proof
            .verify::<Blake3Hasher>(b"zucchini", None, &root(&tree))
            .unwrap();
    }
}
