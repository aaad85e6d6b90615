#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic per-column token feeds.
//!
//! Every column of the board owns an independent pseudo-random stream
//! derived from the game seed and the column index. The streams drive both
//! the initial population and every later refill, so a seed plus a sequence
//! of player moves reproduces an entire game.

use ball_drop_core::TokenColor;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const RNG_STREAM_COLUMN_LABEL: &str = "ball-drop/column";

/// Deterministic stream of unit floats feeding a single column.
#[derive(Clone, Debug)]
pub struct ColumnGenerator {
    column: u32,
    rng: ChaCha8Rng,
}

impl ColumnGenerator {
    /// Creates the generator for `column` under the provided game seed.
    #[must_use]
    pub fn new(seed: &str, column: u32) -> Self {
        Self {
            column,
            rng: ChaCha8Rng::seed_from_u64(derive_column_seed(seed, column)),
        }
    }

    /// Column this generator feeds.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Draws the next value of the stream, uniformly distributed in `[0, 1)`.
    pub fn next_value(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Draws the color of the next token fed into the column.
    ///
    /// `variants` of zero is treated as a single variant.
    pub fn next_color(&mut self, variants: u32) -> TokenColor {
        let variants = variants.max(1);
        let scaled = (self.next_value() * f64::from(variants)).floor() as u32;
        TokenColor::new(scaled.min(variants - 1))
    }
}

/// One [`ColumnGenerator`] per board column.
#[derive(Clone, Debug)]
pub struct ColumnFeeds {
    generators: Vec<ColumnGenerator>,
}

impl ColumnFeeds {
    /// Creates feeds for `columns` columns under the provided game seed.
    #[must_use]
    pub fn for_seed(seed: &str, columns: u32) -> Self {
        Self {
            generators: (0..columns)
                .map(|column| ColumnGenerator::new(seed, column))
                .collect(),
        }
    }

    /// Number of columns fed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Reports whether no column is fed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Mutable access to the generator feeding `column`.
    pub fn column_mut(&mut self, column: u32) -> Option<&mut ColumnGenerator> {
        let index = usize::try_from(column).ok()?;
        self.generators.get_mut(index)
    }

    /// Iterates over the generators in column order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColumnGenerator> {
        self.generators.iter_mut()
    }
}

fn derive_column_seed(seed: &str, column: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(RNG_STREAM_COLUMN_LABEL.as_bytes());
    hasher.update(column.to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
