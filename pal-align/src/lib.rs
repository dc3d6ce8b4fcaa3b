//! Optimal pairwise sequence alignment with affine gap penalties.
//!
//! Provides global, overlap (semi-global) and local alignment using Gotoh's
//! three-state dynamic programming, with substitution matrices that can be
//! built from match/mismatch scores, read from NCBI-style text tables, or
//! taken from the built-in BLOSUM62. Local alignment can be called
//! repeatedly to enumerate ranked, non-overlapping suboptimal alignments.
//!
//! # Quick start
//!
//! ```
//! use pal_align::{GlobalAlignment, SeqRecord, SubstitutionMatrix};
//!
//! let query = SeqRecord::new("q", "MKFLALF");
//! let subject = SeqRecord::new("s", "MKYLILLF");
//! let blosum = SubstitutionMatrix::blosum62();
//!
//! let mut aln = GlobalAlignment::new(&query, &subject, &blosum, -5.0, -2.0).unwrap();
//! aln.align().unwrap();
//! assert_eq!(aln.score(), 19.0);
//! assert_eq!((aln.gaps(), aln.mismatches()), (1, 2));
//! println!("{aln}");
//! ```

pub mod types;
pub mod scoring;
pub mod matrix;
pub mod render;
pub mod sequence;
pub mod alignment;
pub mod global;
pub mod overlap;
pub mod local;
pub mod batch;

pub use types::{AlignmentMode, AlignmentSummary, Coordinate};
pub use scoring::{GapPenalties, SubstitutionMatrix, ALPHABET};
pub use matrix::{Cell, DpMatrix, MatrixView, Step};
pub use sequence::SeqRecord;
pub use alignment::{Alignment, DEFAULT_LINE_LENGTH};
pub use global::GlobalAlignment;
pub use overlap::OverlapAlignment;
pub use local::{LocalAlignment, LocalState};
pub use batch::align_batch;

use pal_core::{Annotated, Sequence};

/// Convenience function: align two sequences in the given mode and return an
/// owned summary.
///
/// Local mode returns the best local alignment only; use [`LocalAlignment`]
/// directly to enumerate suboptimal ones. When no positive-scoring local
/// alignment exists the summary is empty with score 0.
///
/// # Errors
///
/// Returns an error if a gap penalty is invalid or a residue is not in the
/// substitution matrix alphabet.
pub fn align<T: Sequence + Annotated + ?Sized>(
    query: &T,
    subject: &T,
    mode: AlignmentMode,
    scores: &SubstitutionMatrix,
    gaps: GapPenalties,
) -> pal_core::Result<AlignmentSummary> {
    match mode {
        AlignmentMode::Global => {
            let mut a = GlobalAlignment::new(query, subject, scores, gaps.open, gaps.extend)?;
            a.align()?;
            Ok(a.to_summary())
        }
        AlignmentMode::Overlap => {
            let mut a = OverlapAlignment::new(query, subject, scores, gaps.open, gaps.extend)?;
            a.align()?;
            Ok(a.to_summary())
        }
        AlignmentMode::Local => {
            let mut a = LocalAlignment::new(query, subject, scores, gaps.open, gaps.extend)?;
            a.align()?;
            Ok(a.to_summary())
        }
    }
}
