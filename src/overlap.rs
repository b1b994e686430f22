//! Overlap queries over the feature set, with an explicit memoization
//! store that every mutation site invalidates.

use crate::feature::{Feature, Range};
use itertools::Itertools;
use std::collections::HashMap;

/// Safety cap for the depth-peeling loop.
const MAX_PEEL_REMOVALS: usize = 100;

/// Caches the answers of the two expensive overlap queries. The stores are
/// derived state only: they are skipped by serialization and must be
/// cleared through [`OverlapAnalyzer::invalidate`] whenever a feature or
/// range changes.
#[derive(Debug, Default)]
pub struct OverlapAnalyzer {
    count_cache: HashMap<(usize, usize), usize>,
    depth_cache: Option<usize>,
}

impl OverlapAnalyzer {
    /// Drops every memoized answer. Cheap, and called unconditionally on
    /// every mutation so no reader can observe a stale entry.
    pub fn invalidate(&mut self) {
        if !self.count_cache.is_empty() || self.depth_cache.is_some() {
            log::debug!("overlap caches invalidated");
        }
        self.count_cache.clear();
        self.depth_cache = None;
    }

    /// Every feature with at least one range touching `[start_base, end_base]`.
    /// Cheap enough for per-render-window calls, so not memoized.
    pub fn features_in_range<'a>(
        features: &'a [Feature],
        start_base: usize,
        end_base: usize,
    ) -> Vec<&'a Feature> {
        features
            .iter()
            .filter(|feature| feature.overlaps_window(start_base, end_base))
            .collect()
    }

    /// Number of features touching `[start_base, end_base]`, memoized per
    /// window.
    pub fn count_features_in_range(
        &mut self,
        features: &[Feature],
        start_base: usize,
        end_base: usize,
    ) -> usize {
        *self
            .count_cache
            .entry((start_base, end_base))
            .or_insert_with(|| {
                features
                    .iter()
                    .filter(|feature| feature.overlaps_window(start_base, end_base))
                    .count()
            })
    }

    /// Estimated maximum stacking depth of overlapping ranges across the
    /// whole feature set.
    ///
    /// Iterative peeling: remove one range that overlaps another until no
    /// range does, at most one is left, or the safety cap is hit; the depth
    /// is the number of removals plus one. This is a bounded approximation,
    /// not an exact maximum-overlap computation, but it is exact for the
    /// common cases (pairwise disjoint ranges give 1, k mutually
    /// overlapping ranges give k).
    pub fn max_overlap_depth(&mut self, features: &[Feature]) -> usize {
        if let Some(depth) = self.depth_cache {
            return depth;
        }
        let depth = Self::peel_depth(features);
        self.depth_cache = Some(depth);
        depth
    }

    fn peel_depth(features: &[Feature]) -> usize {
        let mut ranges: Vec<Range> = features
            .iter()
            .flat_map(|feature| feature.ranges().iter().copied())
            .collect();
        let mut removals = 0;
        while ranges.len() > 1 && removals < MAX_PEEL_REMOVALS {
            let overlapping = (0..ranges.len())
                .cartesian_product(0..ranges.len())
                .find(|(a, b)| a != b && ranges[*a].overlaps(&ranges[*b]))
                .map(|(a, _)| a);
            match overlapping {
                Some(index) => {
                    ranges.swap_remove(index);
                    removals += 1;
                }
                None => break,
            }
        }
        removals + 1
    }

    pub(crate) fn cached_count_queries(&self) -> usize {
        self.count_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureMetadata;

    fn feature(name: &str, ranges: &[(usize, usize)]) -> Feature {
        Feature::new(
            FeatureMetadata::new(name, "misc"),
            ranges
                .iter()
                .map(|(from, to)| Range::new(*from, *to).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_features_in_range_matches_any_range() {
        let features = vec![
            feature("a", &[(0, 4)]),
            feature("b", &[(10, 14)]),
            feature("spliced", &[(2, 3), (20, 24)]),
        ];
        let hits = OverlapAnalyzer::features_in_range(&features, 3, 11);
        let names: Vec<&str> = hits.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a", "b", "spliced"]);
        let hits = OverlapAnalyzer::features_in_range(&features, 15, 19);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_count_is_memoized_until_invalidated() {
        let features = vec![feature("a", &[(0, 4)]), feature("b", &[(3, 8)])];
        let mut analyzer = OverlapAnalyzer::default();
        assert_eq!(analyzer.count_features_in_range(&features, 0, 10), 2);
        assert_eq!(analyzer.cached_count_queries(), 1);

        // A stale cache would keep answering 2 for the old feature set;
        // invalidation forces a recount.
        let fewer = vec![feature("a", &[(0, 4)])];
        assert_eq!(analyzer.count_features_in_range(&fewer, 0, 10), 2);
        analyzer.invalidate();
        assert_eq!(analyzer.count_features_in_range(&fewer, 0, 10), 1);
    }

    #[test]
    fn test_depth_is_one_for_disjoint_ranges() {
        let features = vec![
            feature("a", &[(0, 2)]),
            feature("b", &[(4, 6)]),
            feature("c", &[(8, 10)]),
        ];
        let mut analyzer = OverlapAnalyzer::default();
        assert_eq!(analyzer.max_overlap_depth(&features), 1);
    }

    #[test]
    fn test_depth_counts_mutually_overlapping_ranges() {
        for k in 2usize..=6 {
            let features: Vec<Feature> = (0..k)
                .map(|i| feature(&format!("f{i}"), &[(i, 100 + i)]))
                .collect();
            let mut analyzer = OverlapAnalyzer::default();
            assert_eq!(analyzer.max_overlap_depth(&features), k);
        }
    }

    #[test]
    fn test_depth_for_empty_and_single_range_sets() {
        let mut analyzer = OverlapAnalyzer::default();
        assert_eq!(analyzer.max_overlap_depth(&[]), 1);
        analyzer.invalidate();
        assert_eq!(analyzer.max_overlap_depth(&[feature("a", &[(0, 5)])]), 1);
    }

    #[test]
    fn test_depth_is_capped() {
        // 150 mutually overlapping ranges would need 149 removals; the cap
        // stops the peeling at 100.
        let features: Vec<Feature> = (0..150usize)
            .map(|i| feature(&format!("f{i}"), &[(i, 1000 + i)]))
            .collect();
        let mut analyzer = OverlapAnalyzer::default();
        assert_eq!(analyzer.max_overlap_depth(&features), 101);
    }

    #[test]
    fn test_depth_is_memoized() {
        let features = vec![feature("a", &[(0, 5)]), feature("b", &[(3, 8)])];
        let mut analyzer = OverlapAnalyzer::default();
        assert_eq!(analyzer.max_overlap_depth(&features), 2);
        // Cached scalar answers even if the caller hands a different set;
        // only invalidation clears it.
        assert_eq!(analyzer.max_overlap_depth(&[]), 2);
        analyzer.invalidate();
        assert_eq!(analyzer.max_overlap_depth(&[]), 1);
    }
}
