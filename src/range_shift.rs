//! Keeps feature ranges consistent with insertions into and deletions from
//! the underlying sequence.

use crate::feature::Feature;
use crate::overlap::OverlapAnalyzer;

/// A single sequence mutation, as seen by the feature coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceEdit {
    /// `len` bases inserted before position `base`.
    Insertion { base: usize, len: usize },
    /// `len` bases removed starting at position `base`, i.e. the window
    /// `[base, base + len - 1]`.
    Deletion { base: usize, len: usize },
}

/// Re-positions every range of every feature for `edit`.
///
/// Ranges that collapse (`from >= to`) are dropped, and features left
/// without ranges are dropped with them. The overlap cache is invalidated
/// unconditionally, even when no range moved.
pub fn shift_ranges(features: &mut Vec<Feature>, edit: SequenceEdit, cache: &mut OverlapAnalyzer) {
    match edit {
        SequenceEdit::Insertion { base, len } if len > 0 => {
            for feature in features.iter_mut() {
                for range in feature.ranges_mut().iter_mut() {
                    if range.from >= base {
                        range.from += len;
                    }
                    if range.to >= base {
                        range.to += len;
                    }
                }
            }
        }
        SequenceEdit::Deletion { base, len } if len > 0 => {
            for feature in features.iter_mut() {
                feature.ranges_mut().retain_mut(|range| {
                    match shifted_for_deletion(range.from, range.to, base, len) {
                        Some((from, to)) => {
                            range.from = from;
                            range.to = to;
                            true
                        }
                        None => false,
                    }
                });
            }
            features.retain(|feature| !feature.ranges().is_empty());
        }
        _ => {}
    }
    cache.invalidate();
}

/// New bounds of a range after deleting `[base, base + len - 1]`, or `None`
/// when the range collapses.
///
/// Done in `i64` so a window that swallows a prefix range can push `to`
/// below zero on the way to being collapsed.
fn shifted_for_deletion(from: usize, to: usize, base: usize, len: usize) -> Option<(usize, usize)> {
    let mut from = from as i64;
    let mut to = to as i64;
    let base = base as i64;
    let window_end = base + len as i64 - 1;

    if window_end < from {
        // Entirely after the deleted window: move left.
        from -= len as i64;
        to -= len as i64;
    } else {
        if to >= base {
            // The tail reaches into or past the window: shrink by the overlap.
            let overlap_start = from.max(base);
            let overlap_end = to.min(window_end);
            to -= overlap_end - overlap_start + 1;
        }
        if from > base {
            // The head sits inside the window: anchor at the deletion point.
            from = base;
        }
    }

    (from < to).then(|| (from as usize, to as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{FeatureMetadata, Range};

    fn feature(ranges: &[(usize, usize)]) -> Feature {
        Feature::new(
            FeatureMetadata::new("f", "misc"),
            ranges
                .iter()
                .map(|(from, to)| Range::new(*from, *to).unwrap())
                .collect(),
        )
        .unwrap()
    }

    fn bounds(features: &[Feature]) -> Vec<(usize, usize)> {
        features
            .iter()
            .flat_map(|f| f.ranges().iter().map(|r| (r.from(), r.to())))
            .collect()
    }

    fn shift(features: &mut Vec<Feature>, edit: SequenceEdit) {
        let mut cache = OverlapAnalyzer::default();
        shift_ranges(features, edit, &mut cache);
    }

    #[test]
    fn test_insertion_before_range_moves_both_bounds() {
        let mut features = vec![feature(&[(5, 8)])];
        shift(
            &mut features,
            SequenceEdit::Insertion { base: 3, len: 3 },
        );
        assert_eq!(bounds(&features), vec![(8, 11)]);
    }

    #[test]
    fn test_insertion_after_range_is_a_no_op() {
        let mut features = vec![feature(&[(5, 8)])];
        shift(
            &mut features,
            SequenceEdit::Insertion { base: 9, len: 4 },
        );
        assert_eq!(bounds(&features), vec![(5, 8)]);
    }

    #[test]
    fn test_insertion_inside_range_grows_it() {
        let mut features = vec![feature(&[(5, 8)])];
        shift(
            &mut features,
            SequenceEdit::Insertion { base: 6, len: 2 },
        );
        assert_eq!(bounds(&features), vec![(5, 10)]);
    }

    #[test]
    fn test_insertion_at_range_start_moves_it() {
        // `from >= base` counts the start itself.
        let mut features = vec![feature(&[(5, 8)])];
        shift(
            &mut features,
            SequenceEdit::Insertion { base: 5, len: 1 },
        );
        assert_eq!(bounds(&features), vec![(6, 9)]);
    }

    #[test]
    fn test_deletion_after_range_is_a_no_op() {
        let mut features = vec![feature(&[(2, 4)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 5, len: 3 },
        );
        assert_eq!(bounds(&features), vec![(2, 4)]);
    }

    #[test]
    fn test_deletion_before_range_moves_it_left() {
        let mut features = vec![feature(&[(8, 11)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 3, len: 3 },
        );
        assert_eq!(bounds(&features), vec![(5, 8)]);
    }

    #[test]
    fn test_deletion_of_range_tail_truncates_it() {
        let mut features = vec![feature(&[(2, 5)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 4, len: 10 },
        );
        assert_eq!(bounds(&features), vec![(2, 3)]);
    }

    #[test]
    fn test_deletion_of_range_head_anchors_at_deletion_point() {
        let mut features = vec![feature(&[(3, 8)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 1, len: 4 },
        );
        assert_eq!(bounds(&features), vec![(1, 6)]);
    }

    #[test]
    fn test_deletion_inside_range_shrinks_it() {
        let mut features = vec![feature(&[(1, 6)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 3, len: 2 },
        );
        assert_eq!(bounds(&features), vec![(1, 4)]);
    }

    #[test]
    fn test_range_fully_inside_deleted_window_is_removed() {
        let mut features = vec![feature(&[(3, 4), (10, 14)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 2, len: 5 },
        );
        assert_eq!(bounds(&features), vec![(5, 9)]);
    }

    #[test]
    fn test_feature_with_no_surviving_range_is_removed() {
        let mut features = vec![feature(&[(3, 4)]), feature(&[(10, 12)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 3, len: 2 },
        );
        assert_eq!(features.len(), 1);
        assert_eq!(bounds(&features), vec![(8, 10)]);
    }

    #[test]
    fn test_deletion_collapsing_range_to_a_single_base_removes_it() {
        // [2,3] loses base 3: a single leftover base is not a live range.
        let mut features = vec![feature(&[(2, 3)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 3, len: 1 },
        );
        assert!(features.is_empty());
    }

    #[test]
    fn test_deletion_of_whole_prefix_including_range() {
        let mut features = vec![feature(&[(0, 5)])];
        shift(
            &mut features,
            SequenceEdit::Deletion { base: 0, len: 6 },
        );
        assert!(features.is_empty());
    }

    #[test]
    fn test_zero_length_edits_change_nothing_but_invalidate() {
        let mut features = vec![feature(&[(2, 6)])];
        let mut cache = OverlapAnalyzer::default();
        cache.count_features_in_range(&features, 0, 10);
        assert_eq!(cache.cached_count_queries(), 1);
        shift_ranges(
            &mut features,
            SequenceEdit::Insertion { base: 0, len: 0 },
            &mut cache,
        );
        assert_eq!(bounds(&features), vec![(2, 6)]);
        assert_eq!(cache.cached_count_queries(), 0);
    }

    /// Exhaustive interval matrix over a small universe: every range and
    /// every deletion window, checked against the case-split invariants.
    #[test]
    fn test_deletion_matrix_invariants() {
        const UNIVERSE: usize = 10;
        for from in 0..UNIVERSE {
            for to in (from + 1)..UNIVERSE {
                for base in 0..UNIVERSE {
                    for len in 1..=UNIVERSE {
                        let window_end = base + len - 1;
                        let shifted = shifted_for_deletion(from, to, base, len);
                        match shifted {
                            Some((new_from, new_to)) => {
                                // Whatever survives is a live range.
                                assert!(new_from < new_to, "{from}..{to} -{len}@{base}");
                            }
                            None => {
                                // Only ranges touched by the window collapse.
                                assert!(
                                    to >= base && from <= window_end,
                                    "{from}..{to} -{len}@{base} vanished without overlap"
                                );
                            }
                        }
                        if window_end < from {
                            // Wholly after: pure left shift.
                            assert_eq!(shifted, Some((from - len, to - len)));
                        } else if to < base {
                            // Wholly before: untouched.
                            assert_eq!(shifted, Some((from, to)));
                        } else if base <= from && to <= window_end {
                            // Wholly inside: removed.
                            assert_eq!(shifted, None);
                        } else {
                            // Partial overlap: the tail shrinks by the
                            // overlap with the window and the head anchors
                            // at the deletion point.
                            let overlap = to.min(window_end) - from.max(base) + 1;
                            let expected_from = from.min(base);
                            let expected_to = to - overlap;
                            if expected_from < expected_to {
                                assert_eq!(shifted, Some((expected_from, expected_to)));
                            } else {
                                assert_eq!(shifted, None);
                            }
                            if let Some((new_from, new_to)) = shifted {
                                assert!(new_from <= from && new_to <= to);
                            }
                        }
                    }
                }
            }
        }
    }
}
