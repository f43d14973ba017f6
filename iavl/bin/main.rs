use anyhow::{bail, Result};
use clap::Parser;
use rand::{Rng as _, SeedableRng as _};

use iavl::{Blake3Hasher, MemoryTree, Options};

mod logging;

/// Build a random IAVL tree, then prove and verify membership and non-membership of keys.
#[derive(Parser, Debug)]
#[command(name = "iavl-prove")]
struct Cli {
    /// The number of entries in the tree.
    #[arg(long, default_value_t = 1000)]
    keys: usize,

    /// The seed for generating entries and queried keys.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// The number of present keys to prove, and of absent keys to prove.
    #[arg(long, default_value_t = 100)]
    samples: usize,

    /// Verify every proof against the committed root as it is built.
    #[arg(long)]
    self_check: bool,
}

fn random_key(rng: &mut rand_pcg::Pcg64) -> Vec<u8> {
    let mut key = vec![0u8; 32];
    rng.fill(&mut key[..]);
    key
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    let mut rng = rand_pcg::Pcg64::seed_from_u64(cli.seed);
    let entries: Vec<(Vec<u8>, Vec<u8>)> = (0..cli.keys)
        .map(|i| (random_key(&mut rng), (i as u64).to_be_bytes().to_vec()))
        .collect();

    let mut options = Options::new();
    options.self_check(cli.self_check);
    let mut tree = MemoryTree::<Blake3Hasher>::from_entries(options, entries.clone());
    let Some(root) = tree.commit() else {
        bail!("cannot prove against an empty tree");
    };
    tracing::info!(
        keys = tree.len(),
        height = tree.height(),
        root = %hex::encode(root),
        "built tree"
    );

    let mut proven = 0;
    for _ in 0..cli.samples {
        let (key, expected) = &entries[rng.gen_range(0..entries.len())];
        let (value, proof) = tree.get_with_proof(key)?;
        if &value != expected {
            bail!("value mismatch for key {}", hex::encode(key));
        }
        proof.verify::<Blake3Hasher>(key, &value, &root)?;
        proven += 1;
    }

    let mut disproven = 0;
    while disproven < cli.samples {
        let key = random_key(&mut rng);
        if tree.get(&key).is_some() {
            continue;
        }
        let proof = tree.prove_absence(&key)?;
        proof.verify::<Blake3Hasher>(&key, &root)?;
        disproven += 1;
    }

    tracing::info!(proven, disproven, "all proofs verified");
    Ok(())
}
