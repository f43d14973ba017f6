//! Core operations and types for proving keys within an IAVL tree.
//!
//! This crate defines the proof schema, the hashing rules and the proving and verification
//! routines in a backend-agnostic manner. Trees are consumed only through the traits in
//! [`tree`].
//!
//! The core types and proof verification routines of this crate do not require the
//! standard library, but do require Rust's alloc crate.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod hasher;
pub mod proof;
pub mod tree;

pub use hasher::NodeHasher;
pub use tree::{Cursor, NodeHash, Snapshot};
