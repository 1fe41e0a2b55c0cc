//! Nibble-packed per-sample bit masks.
//!
//! # Layout
//!
//! Samples are packed 8 per `u32` word with one 4-bit nibble per sample. Only
//! the lowest bit of each nibble is ever set by [`PackedMask`]; the scoring
//! kernel shifts whole words left by up to 3 bits to place each rule dimension
//! in its own bit of the nibble, then adds them together to obtain 8 bucket
//! indices at once.
//!
//! Within word `w`, sample `8w + k` lives in the nibble starting at bit
//! `4 * (7 - k)`: the first sample of a batch occupies the highest nibble.
//! A final partial word keeps the same positions, so its used nibbles are the
//! high ones and the low nibbles are zero.

/// Samples per packed word.
pub const SAMPLES_PER_WORD: usize = 8;

/// Bits reserved per sample inside a word.
pub const BITS_PER_SAMPLE: usize = 4;

/// A read-only bit per sample, packed for the bucket kernel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedMask {
    words: Vec<u32>,
    n_samples: usize,
}

impl PackedMask {
    /// A mask with every bit cleared.
    pub fn zeros(n_samples: usize) -> Self {
        Self {
            words: vec![0; n_samples.div_ceil(SAMPLES_PER_WORD)],
            n_samples,
        }
    }

    /// Build a mask by evaluating `f` for every sample index.
    pub fn from_fn(n_samples: usize, mut f: impl FnMut(usize) -> bool) -> Self {
        let mut mask = Self::zeros(n_samples);
        for sample in 0..n_samples {
            if f(sample) {
                mask.set(sample, true);
            }
        }
        mask
    }

    /// Build a mask from a sequence of bits.
    pub fn from_bools(bits: &[bool]) -> Self {
        Self::from_fn(bits.len(), |i| bits[i])
    }

    #[inline]
    fn position(sample: usize) -> (usize, u32) {
        let word = sample / SAMPLES_PER_WORD;
        let lane = sample % SAMPLES_PER_WORD;
        (word, (BITS_PER_SAMPLE * (SAMPLES_PER_WORD - 1 - lane)) as u32)
    }

    /// Set or clear the bit of one sample.
    ///
    /// # Panics
    ///
    /// Panics if `sample >= n_samples`.
    #[inline]
    pub fn set(&mut self, sample: usize, value: bool) {
        assert!(
            sample < self.n_samples,
            "sample {sample} out of range for mask of {} samples",
            self.n_samples
        );
        let (word, shift) = Self::position(sample);
        if value {
            self.words[word] |= 1 << shift;
        } else {
            self.words[word] &= !(1 << shift);
        }
    }

    /// Bit of one sample.
    ///
    /// # Panics
    ///
    /// Panics if `sample >= n_samples`.
    #[inline]
    pub fn get(&self, sample: usize) -> bool {
        assert!(
            sample < self.n_samples,
            "sample {sample} out of range for mask of {} samples",
            self.n_samples
        );
        let (word, shift) = Self::position(sample);
        (self.words[word] >> shift) & 1 == 1
    }

    /// Packed words, `ceil(n_samples / 8)` of them.
    #[inline]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Number of samples whose bit is set.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over all bits in sample order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.n_samples).map(move |i| self.get(i))
    }
}
