use lazy_static::lazy_static;
use transforms::SequenceTransforms;

pub mod autosave;
pub mod display;
pub mod document;
pub mod error;
pub mod feature;
pub mod frame;
pub mod history;
pub mod overlap;
pub mod range_shift;
pub mod transforms;

lazy_static! {
    // Nucleotide complement and codon translation tables
    pub static ref TRANSFORMS: SequenceTransforms = SequenceTransforms::default();
}
