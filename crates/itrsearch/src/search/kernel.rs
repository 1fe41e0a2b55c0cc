//! Scoring kernels.
//!
//! For one choice, every sample falls into a bucket
//!
//! ```text
//! bucket = action + Σ_d bit_d << (depth - d)
//! ```
//!
//! where `bit_d` is the sample's membership for dimension `d`. Bucket `2m + a`
//! therefore holds the response sum of samples with membership pattern `m`
//! (first dimension in the highest bit) and action `a`, and the score of
//! direction mask `m` is `bucket[2m + 1] - bucket[2m]`.
//!
//! # Kernels
//!
//! - [`accumulate_packed`]: works on [`PackedMask`] words. One shift and add
//!   per dimension builds eight 4-bit bucket indices at once, which are then
//!   peeled off the low end of the word. The last `n % 8` samples sit in the
//!   high nibbles of a partial word and are shifted down before peeling.
//! - [`accumulate_reference`]: one sample at a time through the provider's
//!   bit accessors. Used to check the packed kernel.
//!
//! Both add responses in different orders, so they agree up to rounding.
//!
//! [`PackedMask`]: crate::data::PackedMask

use std::str::FromStr;

use super::choice::Choice;
use crate::data::{BITS_PER_SAMPLE, DatasetProvider, SAMPLES_PER_WORD};

const NIBBLE: u32 = (1 << BITS_PER_SAMPLE) - 1;

/// Which accumulation kernel a search uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// Eight samples per word (default).
    #[default]
    Packed,
    /// One sample at a time.
    Reference,
}

impl KernelKind {
    /// Accumulate the buckets of one choice.
    #[inline]
    pub fn accumulate<D: DatasetProvider + ?Sized>(self, data: &D, choice: &Choice, buckets: &mut [f64]) {
        match self {
            Self::Packed => accumulate_choice_packed(data, choice, buckets),
            Self::Reference => accumulate_reference(data, choice, buckets),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Packed => "packed",
            Self::Reference => "reference",
        }
    }
}

/// Error returned when parsing an unknown [`KernelKind`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kernel {0:?} (expected packed or reference)")]
pub struct UnknownKernel(pub String);

impl FromStr for KernelKind {
    type Err = UnknownKernel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "packed" => Ok(Self::Packed),
            "reference" => Ok(Self::Reference),
            other => Err(UnknownKernel(other.to_string())),
        }
    }
}

// =============================================================================
// Packed Kernel
// =============================================================================

/// Accumulate bucket sums from packed words.
///
/// # Arguments
///
/// * `cut_words` - Packed membership words, one slice per rule dimension
/// * `action_words` - Packed action words
/// * `responses` - Response per sample; its length is the sample count
/// * `buckets` - Output, `2^(depth + 1)` entries, added to (not cleared)
///
/// `depth` is `cut_words.len()` and must be at most 3, so that a bucket index
/// fits in one nibble.
pub fn accumulate_packed(
    cut_words: &[&[u32]],
    action_words: &[u32],
    responses: &[f64],
    buckets: &mut [f64],
) {
    let depth = cut_words.len();
    assert!(depth < BITS_PER_SAMPLE, "depth {depth} does not fit a nibble");
    assert_eq!(buckets.len(), 2 << depth, "bucket count must be 2^(depth + 1)");

    let n_words = responses.len().div_ceil(SAMPLES_PER_WORD);
    debug_assert!(action_words.len() >= n_words);
    debug_assert!(cut_words.iter().all(|w| w.len() >= n_words));

    let word_index = |w: usize| -> u32 {
        let mut idx = action_words[w];
        for (d, words) in cut_words.iter().enumerate() {
            idx += words[w] << (depth - d);
        }
        idx
    };

    let chunks = responses.chunks_exact(SAMPLES_PER_WORD);
    let tail = chunks.remainder();
    let n_full = chunks.len();

    for (w, chunk) in chunks.enumerate() {
        let mut idx = word_index(w);
        // The last sample of the batch sits in the lowest nibble
        for &y in chunk.iter().rev() {
            buckets[(idx & NIBBLE) as usize] += y;
            idx >>= BITS_PER_SAMPLE;
        }
    }

    if !tail.is_empty() {
        // Drop the unused low nibbles of the partial word
        let unused = SAMPLES_PER_WORD - tail.len();
        let mut idx = word_index(n_full) >> (BITS_PER_SAMPLE * unused);
        for &y in tail.iter().rev() {
            buckets[(idx & NIBBLE) as usize] += y;
            idx >>= BITS_PER_SAMPLE;
        }
    }
}

/// Packed accumulation for one choice of a provider.
pub fn accumulate_choice_packed<D: DatasetProvider + ?Sized>(
    data: &D,
    choice: &Choice,
    buckets: &mut [f64],
) {
    let mut cut_words: [&[u32]; 3] = [&[]; 3];
    for (d, (var, cut)) in choice.dims().enumerate() {
        cut_words[d] = data.cut_mask(var, cut).words();
    }
    accumulate_packed(
        &cut_words[..choice.depth()],
        data.action_mask().words(),
        data.responses(),
        buckets,
    );
}

// =============================================================================
// Reference Kernel
// =============================================================================

/// Bucket index of one sample for one choice.
#[inline]
pub fn bucket_index<D: DatasetProvider + ?Sized>(data: &D, choice: &Choice, sample: usize) -> usize {
    let depth = choice.depth();
    let action = data.action(sample) as usize;
    debug_assert!(action <= 1, "action code {action} is not binary");

    choice
        .dims()
        .enumerate()
        .fold(action, |idx, (d, (var, cut))| {
            idx + ((data.membership(var, cut, sample) as usize) << (depth - d))
        })
}

/// Accumulate bucket sums one sample at a time.
pub fn accumulate_reference<D: DatasetProvider + ?Sized>(data: &D, choice: &Choice, buckets: &mut [f64]) {
    assert_eq!(
        buckets.len(),
        2 << choice.depth(),
        "bucket count must be 2^(depth + 1)"
    );
    for sample in 0..data.n_samples() {
        buckets[bucket_index(data, choice, sample)] += data.response(sample);
    }
}

// =============================================================================
// Contrast
// =============================================================================

/// Turn bucket sums into one score per direction mask.
///
/// `scores[m] = buckets[2m + 1] - buckets[2m]`.
#[inline]
pub fn contrast(buckets: &[f64], scores: &mut [f64]) {
    debug_assert_eq!(buckets.len(), 2 * scores.len());
    for (score, pair) in scores.iter_mut().zip(buckets.chunks_exact(2)) {
        *score = pair[1] - pair[0];
    }
}

/// Score one choice into its block of the score table.
///
/// `buckets` is scratch space of `2^(depth + 1)` entries; it is cleared here.
#[inline]
pub fn score_choice<D: DatasetProvider + ?Sized>(
    kernel: KernelKind,
    data: &D,
    choice: &Choice,
    buckets: &mut [f64],
    scores: &mut [f64],
) {
    buckets.fill(0.0);
    kernel.accumulate(data, choice, buckets);
    contrast(buckets, scores);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PackedMask;
    use approx::assert_relative_eq;
    use rand::prelude::*;

    /// Minimal provider over explicit bit vectors.
    struct Bits {
        cuts: Vec<PackedMask>,
        actions: PackedMask,
        responses: Vec<f64>,
    }

    impl Bits {
        /// `n` samples, `n_vars` single-cut variables with random bits.
        fn random(n: usize, n_vars: usize, seed: u64) -> Self {
            let mut rng = StdRng::seed_from_u64(seed);
            let cuts = (0..n_vars)
                .map(|_| PackedMask::from_fn(n, |_| rng.gen_bool(0.5)))
                .collect();
            let actions = PackedMask::from_fn(n, |_| rng.gen_bool(0.5));
            let responses = (0..n).map(|_| rng.gen_range(-50.0..50.0)).collect();
            Self {
                cuts,
                actions,
                responses,
            }
        }
    }

    impl DatasetProvider for Bits {
        fn n_samples(&self) -> usize {
            self.responses.len()
        }
        fn n_vars(&self) -> usize {
            self.cuts.len()
        }
        fn n_cuts(&self, _var: usize) -> usize {
            1
        }
        fn cut_mask(&self, var: usize, _cut: usize) -> &PackedMask {
            &self.cuts[var]
        }
        fn action_mask(&self) -> &PackedMask {
            &self.actions
        }
        fn responses(&self) -> &[f64] {
            &self.responses
        }
        fn baseline(&self) -> f64 {
            0.0
        }
        fn cut_description(&self, var: usize, _cut: usize, upper: bool) -> String {
            format!("v{var}={upper}")
        }
    }

    fn choice_for(depth: usize) -> Choice {
        let vars: Vec<usize> = (0..depth).collect();
        Choice::new(&vars, &vec![0; depth])
    }

    #[test]
    fn test_bucket_index_layout() {
        // One sample: action 1, memberships (1, 0, 1)
        let data = Bits {
            cuts: vec![
                PackedMask::from_bools(&[true]),
                PackedMask::from_bools(&[false]),
                PackedMask::from_bools(&[true]),
            ],
            actions: PackedMask::from_bools(&[true]),
            responses: vec![1.0],
        };
        // 1 + (1 << 3) + (0 << 2) + (1 << 1)
        assert_eq!(bucket_index(&data, &choice_for(3), 0), 11);
        assert_eq!(bucket_index(&data, &choice_for(1), 0), 3);
    }

    #[test]
    fn test_packed_matches_reference_all_tails() {
        for depth in 1..=3 {
            let choice = choice_for(depth);
            for n in 40..48 {
                let data = Bits::random(n, 3, n as u64);
                let mut packed = vec![0.0; 2 << depth];
                let mut reference = vec![0.0; 2 << depth];
                accumulate_choice_packed(&data, &choice, &mut packed);
                accumulate_reference(&data, &choice, &mut reference);
                for (p, r) in packed.iter().zip(&reference) {
                    assert_relative_eq!(p, r, max_relative = 1e-9, epsilon = 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_packed_matches_reference_across_seeds() {
        let choice = choice_for(3);
        for seed in 0..16 {
            let data = Bits::random(203, 3, seed);
            let mut packed = vec![0.0; 16];
            let mut reference = vec![0.0; 16];
            accumulate_choice_packed(&data, &choice, &mut packed);
            accumulate_reference(&data, &choice, &mut reference);
            for (p, r) in packed.iter().zip(&reference) {
                assert_relative_eq!(p, r, max_relative = 1e-9, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_fewer_samples_than_one_word() {
        for n in 1..8 {
            let data = Bits::random(n, 2, 7);
            let choice = choice_for(2);
            let mut packed = vec![0.0; 8];
            let mut reference = vec![0.0; 8];
            accumulate_choice_packed(&data, &choice, &mut packed);
            accumulate_reference(&data, &choice, &mut reference);
            for (p, r) in packed.iter().zip(&reference) {
                assert_relative_eq!(p, r, max_relative = 1e-9, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_buckets_partition_all_samples() {
        let data = Bits::random(101, 3, 1);
        let total: f64 = data.responses.iter().sum();
        for depth in 1..=3 {
            let mut buckets = vec![0.0; 2 << depth];
            accumulate_choice_packed(&data, &choice_for(depth), &mut buckets);
            assert_relative_eq!(buckets.iter().sum::<f64>(), total, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_samples() {
        let data = Bits::random(0, 1, 2);
        let mut buckets = vec![0.0; 4];
        accumulate_choice_packed(&data, &choice_for(1), &mut buckets);
        assert_eq!(buckets, vec![0.0; 4]);
    }

    #[test]
    fn test_contrast() {
        let buckets = [1.0, 4.0, 2.0, 3.0];
        let mut scores = [0.0; 2];
        contrast(&buckets, &mut scores);
        assert_eq!(scores, [3.0, 1.0]);
    }

    #[test]
    fn test_score_choice_clears_scratch() {
        let data = Bits::random(16, 1, 3);
        let choice = choice_for(1);
        let mut buckets = vec![99.0; 4];
        let mut first = [0.0; 2];
        let mut second = [0.0; 2];
        score_choice(KernelKind::Packed, &data, &choice, &mut buckets, &mut first);
        score_choice(KernelKind::Packed, &data, &choice, &mut buckets, &mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_kernel_from_str() {
        assert_eq!("packed".parse::<KernelKind>().unwrap(), KernelKind::Packed);
        assert_eq!("Reference".parse::<KernelKind>().unwrap(), KernelKind::Reference);
        assert_eq!(
            "simd".parse::<KernelKind>(),
            Err(UnknownKernel("simd".to_string()))
        );
        assert_eq!(
            UnknownKernel("simd".into()).to_string(),
            "unknown kernel \"simd\" (expected packed or reference)"
        );
    }
}
