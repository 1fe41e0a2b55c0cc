//! Static partitioning of choices across workers.
//!
//! Every choice costs one pass over the samples regardless of its cuts, so
//! equal-sized contiguous ranges are already balanced.

use std::ops::Range;

/// Split `0..n_items` into `n_workers` contiguous ranges.
///
/// The first `n_items % n_workers` ranges get one extra item. Ranges may be
/// empty when there are more workers than items.
///
/// # Panics
///
/// Panics if `n_workers == 0`.
///
/// # Example
///
/// ```
/// use itrsearch::search::partition_ranges;
///
/// assert_eq!(partition_ranges(10, 3), vec![0..4, 4..7, 7..10]);
/// ```
pub fn partition_ranges(n_items: usize, n_workers: usize) -> Vec<Range<usize>> {
    assert!(n_workers > 0, "cannot partition work across zero workers");

    let base = n_items / n_workers;
    let remainder = n_items % n_workers;

    (0..n_workers)
        .map(|worker| {
            let (start, len) = if worker < remainder {
                ((base + 1) * worker, base + 1)
            } else {
                (base * worker + remainder, base)
            };
            start..start + len
        })
        .collect()
}

/// Cut `slice` into one disjoint block per range.
///
/// Item `i` owns `slice[i * stride..(i + 1) * stride]`, so range `r` receives
/// `slice[r.start * stride..r.end * stride]`.
///
/// # Panics
///
/// Panics if the ranges are not contiguous from 0 or do not cover `slice`
/// exactly.
pub fn split_by_ranges<'s, T>(
    slice: &'s mut [T],
    ranges: &[Range<usize>],
    stride: usize,
) -> Vec<(Range<usize>, &'s mut [T])> {
    let mut rest = slice;
    let mut expected_start = 0;
    let mut blocks = Vec::with_capacity(ranges.len());

    for range in ranges {
        assert_eq!(
            range.start, expected_start,
            "work ranges must be contiguous: expected start {expected_start}, got {range:?}"
        );
        let (block, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * stride);
        blocks.push((range.clone(), block));
        rest = tail;
        expected_start = range.end;
    }

    assert!(
        rest.is_empty(),
        "work ranges cover {expected_start} items but the table holds {} more entries",
        rest.len()
    );
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 3)]
    #[case(9, 3)]
    #[case(2, 5)]
    #[case(0, 4)]
    #[case(1000, 7)]
    #[case(17, 1)]
    fn test_ranges_cover_exactly(#[case] n_items: usize, #[case] n_workers: usize) {
        let ranges = partition_ranges(n_items, n_workers);
        assert_eq!(ranges.len(), n_workers);

        let mut next = 0;
        for range in &ranges {
            assert_eq!(range.start, next);
            next = range.end;
        }
        assert_eq!(next, n_items);

        // Sizes differ by at most one, larger ranges first
        let sizes: Vec<usize> = ranges.iter().map(|r| r.len()).collect();
        let max = *sizes.iter().max().unwrap();
        let min = *sizes.iter().min().unwrap();
        assert!(max - min <= 1);
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_remainder_goes_first() {
        assert_eq!(partition_ranges(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn test_more_workers_than_items() {
        assert_eq!(partition_ranges(2, 4), vec![0..1, 1..2, 2..2, 2..2]);
    }

    #[test]
    #[should_panic(expected = "zero workers")]
    fn test_zero_workers_panics() {
        partition_ranges(5, 0);
    }

    #[test]
    fn test_split_by_ranges() {
        let mut table: Vec<u32> = (0..20).collect();
        let ranges = partition_ranges(5, 2);
        let blocks = split_by_ranges(&mut table, &ranges, 4);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].0, 0..3);
        assert_eq!(blocks[0].1, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(blocks[1].0, 3..5);
        assert_eq!(blocks[1].1, &[12, 13, 14, 15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_split_blocks_are_writable() {
        let mut table = vec![0u32; 12];
        let ranges = partition_ranges(3, 3);
        for (range, block) in split_by_ranges(&mut table, &ranges, 4) {
            block.fill(range.start as u32);
        }
        assert_eq!(table, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    #[should_panic(expected = "table holds")]
    fn test_split_rejects_partial_cover() {
        let mut table = vec![0u32; 12];
        split_by_ranges(&mut table, &[0..2], 4);
    }
}
