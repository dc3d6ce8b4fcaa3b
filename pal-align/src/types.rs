//! Core types for alignment modes and results.

use core::fmt;

use pal_core::{Scored, Summarizable};

/// The alignment strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentMode {
    /// Both sequences aligned end to end; leading and trailing gaps are charged.
    Global,
    /// Semi-global alignment; gaps at either end of either sequence are free.
    Overlap,
    /// Best-scoring pair of subsequences (Smith-Waterman).
    Local,
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AlignmentMode::Global => "global",
            AlignmentMode::Overlap => "overlap",
            AlignmentMode::Local => "local",
        })
    }
}

/// A DP cell where a local traceback may start, with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Row (query position, 1-based).
    pub i: usize,
    /// Column (subject position, 1-based).
    pub j: usize,
    pub score: f64,
}

/// An owned snapshot of a finished alignment, detached from the sequences
/// and the DP matrix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignmentSummary {
    pub mode: AlignmentMode,
    pub score: f64,
    /// Aligned query with `-` for gaps.
    pub aligned_query: Vec<u8>,
    /// Aligned subject with `-` for gaps.
    pub aligned_subject: Vec<u8>,
    pub gaps: usize,
    pub mismatches: usize,
    /// 0-based offset of the first aligned query residue.
    pub query_start: usize,
    /// 0-based offset of the first aligned subject residue.
    pub subject_start: usize,
}

impl AlignmentSummary {
    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.aligned_query.len()
    }

    /// Whether the alignment has no columns.
    pub fn is_empty(&self) -> bool {
        self.aligned_query.is_empty()
    }

    /// Fraction of columns holding identical residues.
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let identical = self.len() - self.gaps - self.mismatches;
        identical as f64 / self.len() as f64
    }
}

impl Scored for AlignmentSummary {
    fn score(&self) -> f64 {
        self.score
    }
}

impl Summarizable for AlignmentSummary {
    fn summary(&self) -> String {
        format!(
            "{} alignment: score {}, {} columns, {} gaps, {} mismatches",
            self.mode,
            crate::render::format_g(self.score, None),
            self.len(),
            self.gaps,
            self.mismatches
        )
    }
}
