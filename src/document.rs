//! The sequence document: a mutable nucleotide sequence plus its features,
//! display settings, edit history and persistence trigger.
//!
//! This is the only mutation entry point. Each edit runs to completion
//! before returning: feature coordinates are shifted, the sequence text is
//! spliced, the overlap caches are dropped, the history step is appended
//! and the coalesced save is scheduled. Callers never observe a
//! half-applied edit.

use crate::autosave::{Autosave, SaveSink};
use crate::display::{AminoAcidView, DisplaySettings};
use crate::error::SeqDocError;
use crate::feature::Feature;
use crate::frame::{
    AminoAcidAt, AminoAcidCode, CodonAt, FrameTranslator, PaddedSubsequence, SequenceVariation,
    TransformOptions,
};
use crate::history::{now_unix_ms, EditHistory, HistoryStep};
use crate::overlap::OverlapAnalyzer;
use crate::range_shift::{shift_ranges, SequenceEdit};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

fn generate_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{n}", now_unix_ms())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SequenceDocument {
    id: String,
    name: String,
    sequence: String,
    features: Vec<Feature>,
    display: DisplaySettings,
    history: EditHistory,
    #[serde(skip)]
    overlap: OverlapAnalyzer,
    #[serde(skip)]
    autosave: Autosave,
}

impl SequenceDocument {
    pub fn new(name: &str, sequence: &str) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            sequence: sequence.to_string(),
            features: vec![],
            display: DisplaySettings::default(),
            history: EditHistory::default(),
            overlap: OverlapAnalyzer::default(),
            autosave: Autosave::default(),
        }
    }

    /// Rebuilds a document from a JSON snapshot produced by
    /// [`SequenceDocument::snapshot_json`]. Caches and the save sink start
    /// fresh.
    pub fn from_json(text: &str) -> Result<Self, SeqDocError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn snapshot_json(&self) -> Result<String, SeqDocError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[inline(always)]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    fn frame(&self) -> FrameTranslator<'_> {
        FrameTranslator::new(self.sequence.as_bytes())
    }

    /// The inclusive subsequence `[start_base, end_base]`, clamped into the
    /// sequence; `None` as end means a single-base lookup. Out-of-range
    /// bounds never fail: an explicit window entirely past the end is empty.
    pub fn get_subsequence(&self, start_base: usize, end_base: Option<usize>) -> String {
        String::from_utf8_lossy(self.frame().subsequence(start_base, end_base)).into_owned()
    }

    pub fn get_padded_subsequence(
        &self,
        start_base: usize,
        end_base: usize,
        block_size: usize,
        frame_offset: usize,
    ) -> PaddedSubsequence {
        self.frame()
            .padded_subsequence(start_base, end_base, block_size, frame_offset)
    }

    pub fn get_codon(&self, base: usize, frame_offset: usize) -> CodonAt {
        self.frame().codon(base, frame_offset)
    }

    pub fn get_amino_acid(
        &self,
        code: AminoAcidCode,
        base: usize,
        frame_offset: usize,
    ) -> AminoAcidAt {
        self.frame().amino_acid(code, base, frame_offset)
    }

    pub fn get_transformed_subsequence(
        &self,
        variation: SequenceVariation,
        options: TransformOptions,
        start_base: usize,
        end_base: usize,
    ) -> String {
        self.frame()
            .transformed_subsequence(variation, options, start_base, end_base)
    }

    /// The amino-acid row the display settings ask for, or `None` when the
    /// amino-acid view is off.
    pub fn get_display_aa_view(&self, start_base: usize, end_base: usize) -> Option<String> {
        let variation = match self.display.aa_view() {
            AminoAcidView::None => return None,
            AminoAcidView::Short => SequenceVariation::AaShort,
            AminoAcidView::Long => SequenceVariation::AaLong,
        };
        let options = TransformOptions {
            complements: false,
            offset: Some(self.display.aa_offset()),
        };
        Some(self.get_transformed_subsequence(variation, options, start_base, end_base))
    }

    /// Inserts `bases` before `before_base` (clamped to the sequence end)
    /// and records the edit.
    pub fn insert_bases(&mut self, bases: &str, before_base: usize) {
        self.insert_bases_with_history(bases, before_base, true);
    }

    pub fn insert_bases_with_history(
        &mut self,
        bases: &str,
        before_base: usize,
        record_history: bool,
    ) {
        if bases.is_empty() {
            return;
        }
        let before_base = before_base.min(self.sequence.len());
        shift_ranges(
            &mut self.features,
            SequenceEdit::Insertion {
                base: before_base,
                len: bases.len(),
            },
            &mut self.overlap,
        );
        self.sequence.insert_str(before_base, bases);
        if record_history {
            self.history.add(HistoryStep::insert(before_base, bases));
        }
        self.schedule_save();
    }

    /// Deletes `count` bases starting at `first_base` and records the edit.
    /// The count is truncated to the available tail; deleting nothing is a
    /// no-op.
    pub fn delete_bases(&mut self, first_base: usize, count: usize) {
        self.delete_bases_with_history(first_base, count, true);
    }

    pub fn delete_bases_with_history(
        &mut self,
        first_base: usize,
        count: usize,
        record_history: bool,
    ) {
        let len = self.sequence.len();
        if first_base >= len {
            return;
        }
        let count = count.min(len - first_base);
        if count == 0 {
            return;
        }
        let removed = self.sequence[first_base..first_base + count].to_string();
        shift_ranges(
            &mut self.features,
            SequenceEdit::Deletion {
                base: first_base,
                len: count,
            },
            &mut self.overlap,
        );
        self.sequence
            .replace_range(first_base..first_base + count, "");
        if record_history {
            self.history.add(HistoryStep::delete(first_base, &removed));
        }
        self.schedule_save();
    }

    #[inline(always)]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
        self.overlap.invalidate();
    }

    pub fn set_features(&mut self, features: Vec<Feature>) {
        self.features = features;
        self.overlap.invalidate();
    }

    pub fn features_in_range(&self, start_base: usize, end_base: usize) -> Vec<&Feature> {
        OverlapAnalyzer::features_in_range(&self.features, start_base, end_base)
    }

    pub fn count_features_in_range(&mut self, start_base: usize, end_base: usize) -> usize {
        self.overlap
            .count_features_in_range(&self.features, start_base, end_base)
    }

    pub fn max_overlap_depth(&mut self) -> usize {
        self.overlap.max_overlap_depth(&self.features)
    }

    #[inline(always)]
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    #[inline(always)]
    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    #[inline(always)]
    pub fn display_mut(&mut self) -> &mut DisplaySettings {
        &mut self.display
    }

    pub fn attach_save_sink(&mut self, sink: Box<dyn SaveSink>) {
        self.autosave.set_sink(sink);
    }

    pub fn set_save_window(&mut self, window: Duration) {
        self.autosave.set_window(window);
    }

    /// Fires a save that was held back by the debounce window, if due.
    pub fn flush_pending_save(&mut self) {
        if self.autosave.flush_due(Instant::now()) {
            self.save_now();
        }
    }

    fn schedule_save(&mut self) {
        if !self.autosave.has_sink() {
            return;
        }
        if self.autosave.request(Instant::now()) {
            self.save_now();
        }
    }

    fn save_now(&mut self) {
        let snapshot = match self.snapshot_json() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("could not serialize document '{}': {err}", self.id);
                return;
            }
        };
        self.autosave.deliver(&snapshot);
    }
}
