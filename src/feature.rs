//! Typed records for annotated features and their base ranges.

use crate::error::SeqDocError;
use serde::{Deserialize, Serialize};

/// An inclusive interval of base positions, 0-indexed.
///
/// A live range always satisfies `from < to`; operations that would
/// degenerate a range remove it instead of keeping it around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub(crate) from: usize,
    pub(crate) to: usize,
}

impl Range {
    pub fn new(from: usize, to: usize) -> Result<Self, SeqDocError> {
        if from >= to {
            return Err(SeqDocError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    #[inline(always)]
    pub fn from(&self) -> usize {
        self.from
    }

    #[inline(always)]
    pub fn to(&self) -> usize {
        self.to
    }

    /// Number of bases covered, always at least 2 for a live range.
    #[inline(always)]
    pub fn base_count(&self) -> usize {
        self.to - self.from + 1
    }

    #[inline(always)]
    pub fn overlaps(&self, other: &Range) -> bool {
        self.from <= other.to && self.to >= other.from
    }

    /// Does this range touch the window `[start_base, end_base]`?
    #[inline(always)]
    pub fn overlaps_window(&self, start_base: usize, end_base: usize) -> bool {
        self.from <= end_base && self.to >= start_base
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FeatureMetadata {
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            description: None,
        }
    }
}

/// A named annotation over one or more ranges of the sequence. Multiple
/// ranges model spliced/discontinuous features; the range order is the
/// caller's and is preserved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    metadata: FeatureMetadata,
    ranges: Vec<Range>,
}

impl Feature {
    pub fn new(metadata: FeatureMetadata, ranges: Vec<Range>) -> Result<Self, SeqDocError> {
        if ranges.is_empty() {
            return Err(SeqDocError::EmptyFeature);
        }
        Ok(Self { metadata, ranges })
    }

    #[inline(always)]
    pub fn metadata(&self) -> &FeatureMetadata {
        &self.metadata
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    #[inline(always)]
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    #[inline(always)]
    pub(crate) fn ranges_mut(&mut self) -> &mut Vec<Range> {
        &mut self.ranges
    }

    pub fn overlaps_window(&self, start_base: usize, end_base: usize) -> bool {
        self.ranges
            .iter()
            .any(|range| range.overlaps_window(start_base, end_base))
    }
}
