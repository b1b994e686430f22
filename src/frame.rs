//! Codon-boundary alignment and translated/complemented sequence views.
//!
//! All window math follows the convention that a reading frame starts at
//! `frame_offset`, which need not be 0: codon boundaries sit at
//! `frame_offset + 3k`, and padded windows snap outward to them.

use crate::TRANSFORMS;

pub const CODON_SIZE: usize = 3;

/// A subsequence window expanded outward to block boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedSubsequence {
    from: usize,
    to: usize,
    text: String,
}

impl PaddedSubsequence {
    #[inline(always)]
    pub fn from(&self) -> usize {
        self.from
    }

    #[inline(always)]
    pub fn to(&self) -> usize {
        self.to
    }

    #[inline(always)]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A codon and the position (0-2) of the queried base within it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodonAt {
    text: String,
    position: usize,
}

impl CodonAt {
    #[inline(always)]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// An amino acid code (or blank placeholder) and the codon position of the
/// queried base.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AminoAcidAt {
    text: String,
    position: usize,
}

impl AminoAcidAt {
    #[inline(always)]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Which amino acid code length to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AminoAcidCode {
    Short,
    Long,
}

/// The transformed views a consumer can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceVariation {
    Complements,
    AaLong,
    AaShort,
}

/// Options for [`FrameTranslator::transformed_subsequence`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Complement each codon before translating it.
    pub complements: bool,
    /// Frame offset; `None` means frame 0.
    pub offset: Option<usize>,
}

/// Borrowing view over sequence bytes that answers all frame-aligned
/// window queries.
#[derive(Clone, Copy, Debug)]
pub struct FrameTranslator<'a> {
    seq: &'a [u8],
}

impl<'a> FrameTranslator<'a> {
    pub fn new(seq: &'a [u8]) -> Self {
        Self { seq }
    }

    /// The inclusive subsequence `[start_base, end_base]`, defensively
    /// clamped into the sequence.
    ///
    /// With `end_base == None` the query is a single-base lookup. When an
    /// explicit end was given and both bounds are past the sequence, the
    /// result is empty rather than a clamp artifact.
    pub fn subsequence(&self, start_base: usize, end_base: Option<usize>) -> &'a [u8] {
        let len = self.seq.len();
        if len == 0 {
            return &[];
        }
        let end_raw = match end_base {
            None => start_base,
            Some(end) => {
                if start_base >= len && end >= len {
                    return &[];
                }
                end
            }
        };
        let start = start_base.min(len - 1);
        let end = end_raw.min(len - 1);
        if end < start {
            return &[];
        }
        &self.seq[start..=end]
    }

    /// Expands `[start_base, end_base]` outward so that no block of
    /// `block_size` bases (counted from `frame_offset`) is cut by the
    /// window edges. The start is clamped at 0, the end at the sequence
    /// length.
    pub fn padded_subsequence(
        &self,
        start_base: usize,
        end_base: usize,
        block_size: usize,
        frame_offset: usize,
    ) -> PaddedSubsequence {
        let block = block_size.max(1) as i64;
        let len = self.seq.len() as i64;
        let start = start_base as i64;
        let end = end_base as i64;
        let offset = frame_offset as i64;

        // Truncated remainder on purpose: a start left of the frame offset
        // pushes the window start forward, which the codon lookup treats as
        // the degenerate sequence-start case.
        let from = (start - (start - offset) % block).max(0);
        let to = (end - (end - offset) % block + block - 1).min(len);

        let text =
            String::from_utf8_lossy(self.subsequence(from as usize, Some(to as usize))).into_owned();
        PaddedSubsequence {
            from: from as usize,
            to: to as usize,
            text,
        }
    }

    /// The codon containing `base` in the frame starting at `frame_offset`,
    /// and the position of `base` within it.
    ///
    /// At the very start of the sequence the padded window can land past
    /// `base`; the fallback is a degenerate single-character codon with
    /// position 1.
    pub fn codon(&self, base: usize, frame_offset: usize) -> CodonAt {
        let padded = self.padded_subsequence(base, base, CODON_SIZE, frame_offset);
        if padded.from() > base {
            let text = self
                .seq
                .get(base)
                .map(|b| (*b as char).to_string())
                .unwrap_or_default();
            return CodonAt { text, position: 1 };
        }
        let position = (base as i64 - frame_offset as i64).rem_euclid(CODON_SIZE as i64) as usize;
        CodonAt {
            text: padded.text,
            position,
        }
    }

    /// The amino acid code for the codon containing `base`. A codon with no
    /// translation (partial, or containing unknown bases) yields a blank
    /// placeholder of the code's display width instead of failing.
    pub fn amino_acid(&self, code: AminoAcidCode, base: usize, frame_offset: usize) -> AminoAcidAt {
        let codon = self.codon(base, frame_offset);
        let text = match code {
            AminoAcidCode::Short => TRANSFORMS
                .codon_to_aa_short(codon.text())
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string()),
            AminoAcidCode::Long => TRANSFORMS
                .codon_to_aa_long(codon.text())
                .map(str::to_string)
                .unwrap_or_else(|| "   ".to_string()),
        };
        AminoAcidAt {
            text,
            position: codon.position(),
        }
    }

    /// A transformed view of `[start_base, end_base]`.
    ///
    /// `Complements` is a plain per-base complement with no frame
    /// alignment. The amino-acid variations render one 3-column cell per
    /// codon of the codon-aligned window, then cut the result back to
    /// exactly the requested bases so the view lines up with nucleotide
    /// columns; left padding that falls before `start_base` becomes
    /// leading spaces.
    pub fn transformed_subsequence(
        &self,
        variation: SequenceVariation,
        options: TransformOptions,
        start_base: usize,
        end_base: usize,
    ) -> String {
        match variation {
            SequenceVariation::Complements => {
                let raw = String::from_utf8_lossy(self.subsequence(start_base, Some(end_base)));
                TRANSFORMS.to_complement(&raw)
            }
            SequenceVariation::AaLong | SequenceVariation::AaShort => {
                let span = (end_base + 1).saturating_sub(start_base);
                if span == 0 {
                    return String::new();
                }
                let frame_offset = options.offset.unwrap_or(0);
                let padded =
                    self.padded_subsequence(start_base, end_base, CODON_SIZE, frame_offset);

                let mut cells = String::with_capacity(padded.text().len());
                for chunk in padded.text().as_bytes().chunks(CODON_SIZE) {
                    cells.push_str(&Self::codon_cell(variation, options.complements, chunk));
                }

                // Cut away the cells introduced purely by padding: skip
                // left-padding columns, keep one column per requested base.
                let lead = padded.from().saturating_sub(start_base);
                let skip = start_base.saturating_sub(padded.from());
                let take = span.saturating_sub(lead);
                let clipped = cells.as_bytes().get(skip..).unwrap_or(&[]);
                let clipped = &clipped[..take.min(clipped.len())];

                let mut output = String::with_capacity(lead + clipped.len());
                for _ in 0..lead {
                    output.push(' ');
                }
                output.push_str(&String::from_utf8_lossy(clipped));
                output
            }
        }
    }

    /// Renders one codon as a 3-column cell. Long codes already have three
    /// letters; short codes are centered. A partial tail chunk renders
    /// empty, an untranslatable full codon renders blank.
    fn codon_cell(variation: SequenceVariation, complements: bool, chunk: &[u8]) -> String {
        if chunk.len() < CODON_SIZE {
            return String::new();
        }
        let codon: String = if complements {
            chunk
                .iter()
                .map(|b| TRANSFORMS.complement_base(*b) as char)
                .collect()
        } else {
            String::from_utf8_lossy(chunk).into_owned()
        };
        match variation {
            SequenceVariation::AaShort => TRANSFORMS
                .codon_to_aa_short(&codon)
                .map(|c| format!(" {c} "))
                .unwrap_or_else(|| "   ".to_string()),
            _ => TRANSFORMS
                .codon_to_aa_long(&codon)
                .map(str::to_string)
                .unwrap_or_else(|| "   ".to_string()),
        }
    }
}
