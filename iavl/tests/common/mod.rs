use iavl::{Blake3Hasher, MemoryTree, NodeHash, Options};

pub type Tree = MemoryTree<Blake3Hasher>;

#[allow(dead_code)]
pub fn key(id: u64) -> Vec<u8> {
    // Keys should be spread over the key space, so derive them from a PRNG seeded with the id.
    use rand::{RngCore as _, SeedableRng as _};
    let mut seed = [0; 16];
    seed[0..8].copy_from_slice(&id.to_le_bytes());
    let mut rng = rand_pcg::Lcg64Xsh32::from_seed(seed);
    let mut key = vec![0u8; 16];
    rng.fill_bytes(&mut key);
    key
}

#[allow(dead_code)]
pub fn value(id: u64) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

#[allow(dead_code)]
pub fn tree_of(keys: &[&str]) -> (Tree, NodeHash) {
    let entries = keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.as_bytes().to_vec(), value(i as u64)));
    let mut tree = Tree::from_entries(Options::new(), entries);
    let root = tree.commit().unwrap();
    (tree, root)
}

/// A tree of `count` pseudo-random keys, with self-checking enabled.
#[allow(dead_code)]
pub fn random_tree(count: u64) -> (Tree, NodeHash) {
    let mut options = Options::new();
    options.self_check(true);
    let mut tree = Tree::from_entries(options, (0..count).map(|id| (key(id), value(id))));
    let root = tree.commit().unwrap();
    (tree, root)
}
