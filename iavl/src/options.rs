/// Options when creating a [`crate::MemoryTree`].
#[derive(Debug, Clone)]
pub struct Options {
    /// Trees taller than this refuse to produce proofs.
    pub(crate) max_height: u8,
    /// Whether every proof is verified against the committed root before being returned.
    pub(crate) self_check: bool,
}

impl Options {
    /// Create a new `Options` instance with the default values.
    pub fn new() -> Self {
        Self {
            max_height: 64,
            self_check: false,
        }
    }

    /// Set the maximum height of a tree for which proofs are produced. Proofs against taller
    /// trees fail with [`crate::ProveError::HeightLimitExceeded`].
    ///
    /// Default: 64.
    pub fn max_height(&mut self, max_height: u8) {
        self.max_height = max_height;
    }

    /// Set self-checking of constructed proofs on or off.
    ///
    /// Default: off.
    pub fn self_check(&mut self, self_check: bool) {
        self.self_check = self_check;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
