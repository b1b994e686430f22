//! Presentation-only settings carried on a document.
//!
//! Nothing in the engine interprets these beyond handing the amino-acid
//! view mode and frame offset to the translation calls; the rest is for
//! consumers rendering the document.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AminoAcidView {
    #[default]
    None,
    Short,
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    numbering: bool,
    show_features: bool,
    aa_view: AminoAcidView,
    aa_offset: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            numbering: true,
            show_features: true,
            aa_view: AminoAcidView::None,
            aa_offset: 0,
        }
    }
}

impl DisplaySettings {
    #[inline(always)]
    pub fn numbering(&self) -> bool {
        self.numbering
    }

    pub fn toggle_numbering(&mut self) {
        self.numbering = !self.numbering;
    }

    #[inline(always)]
    pub fn show_features(&self) -> bool {
        self.show_features
    }

    pub fn toggle_show_features(&mut self) {
        self.show_features = !self.show_features;
    }

    #[inline(always)]
    pub fn aa_view(&self) -> AminoAcidView {
        self.aa_view
    }

    pub fn set_aa_view(&mut self, aa_view: AminoAcidView) {
        self.aa_view = aa_view;
    }

    /// Frame offset handed to translation calls when an amino-acid row is
    /// rendered.
    #[inline(always)]
    pub fn aa_offset(&self) -> usize {
        self.aa_offset
    }

    pub fn set_aa_offset(&mut self, aa_offset: usize) {
        self.aa_offset = aa_offset;
    }
}
