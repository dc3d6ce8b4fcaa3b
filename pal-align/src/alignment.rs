//! State and accessors shared by the global, overlap and local aligners.

use core::fmt;

use pal_core::{Annotated, PalError, Result, Scored, Sequence};

use crate::matrix::{DpMatrix, MatrixView, Step};
use crate::render::{elastic_tabs, format_g, plural};
use crate::scoring::{GapPenalties, SubstitutionMatrix};
use crate::types::{AlignmentMode, AlignmentSummary};

/// Default number of alignment columns per block when printing.
pub const DEFAULT_LINE_LENGTH: usize = 70;

/// A pairwise alignment of `query` against `subject`.
///
/// Owns the DP matrix and the aligned buffers; borrows the sequences and the
/// substitution matrix. The mode-specific wrappers
/// ([`GlobalAlignment`](crate::GlobalAlignment),
/// [`OverlapAlignment`](crate::OverlapAlignment),
/// [`LocalAlignment`](crate::LocalAlignment)) fill it in and dereference to
/// it for the shared accessors.
#[derive(Debug)]
pub struct Alignment<'a, T: ?Sized> {
    mode: AlignmentMode,
    pub(crate) query: &'a T,
    pub(crate) subject: &'a T,
    pub(crate) scores: &'a SubstitutionMatrix,
    pub(crate) gaps: GapPenalties,
    pub(crate) table: DpMatrix,
    pub(crate) aligned_query: Vec<u8>,
    pub(crate) aligned_subject: Vec<u8>,
    pub(crate) score: f64,
    pub(crate) gap_count: usize,
    pub(crate) mismatch_count: usize,
    line_length: usize,
    pub(crate) query_start: usize,
    pub(crate) subject_start: usize,
    subject_length: usize,
}

impl<'a, T: Sequence + Annotated + ?Sized> Alignment<'a, T> {
    pub(crate) fn new(
        mode: AlignmentMode,
        query: &'a T,
        subject: &'a T,
        scores: &'a SubstitutionMatrix,
        gap_open: f64,
        gap_extend: f64,
    ) -> Result<Self> {
        let gaps = GapPenalties::new(gap_open, gap_extend)?;
        let (m, n) = (query.len(), subject.len());
        log::debug!("new {} alignment: {}x{} residues", mode, m, n);
        Ok(Self {
            mode,
            query,
            subject,
            scores,
            gaps,
            table: DpMatrix::new(m + 1, n + 1),
            aligned_query: Vec::with_capacity(m + n),
            aligned_subject: Vec::with_capacity(m + n),
            score: 0.0,
            gap_count: 0,
            mismatch_count: 0,
            line_length: DEFAULT_LINE_LENGTH,
            query_start: 0,
            subject_start: 0,
            subject_length: n,
        })
    }

    /// The aligned query and subject, with `-` for gaps. Both slices have
    /// the same length.
    pub fn raw_alignment(&self) -> (&[u8], &[u8]) {
        (&self.aligned_query, &self.aligned_subject)
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Number of columns containing a gap.
    pub fn gaps(&self) -> usize {
        self.gap_count
    }

    /// Number of columns pairing two different residues.
    pub fn mismatches(&self) -> usize {
        self.mismatch_count
    }

    /// 0-based offset of the first aligned query residue.
    pub fn query_start(&self) -> usize {
        self.query_start
    }

    /// 0-based offset of the first aligned subject residue.
    pub fn subject_start(&self) -> usize {
        self.subject_start
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    pub fn gap_penalties(&self) -> GapPenalties {
        self.gaps
    }

    /// Number of columns per block when printing. Zero is ignored.
    pub fn set_line_length(&mut self, line_length: usize) {
        if line_length > 0 {
            self.line_length = line_length;
        }
    }

    /// Shift printed subject positions, for a subject that is a fragment of
    /// a longer sequence starting at 0-based offset `start`.
    pub fn set_subject_start(&mut self, start: usize) {
        self.subject_start = start;
    }

    /// Override the subject length shown in the printed header.
    pub fn set_subject_length(&mut self, length: usize) {
        self.subject_length = length;
    }

    /// The DP matrix, `(m + 1) x (n + 1)`.
    pub fn dp_matrix(&self) -> &DpMatrix {
        &self.table
    }

    /// Render the DP matrix as scores or traceback moves.
    pub fn print_matrix(&self, view: MatrixView) -> String {
        self.table.render(self.query.as_bytes(), self.subject.as_bytes(), view)
    }

    /// An owned copy of the current result.
    pub fn to_summary(&self) -> AlignmentSummary {
        AlignmentSummary {
            mode: self.mode,
            score: self.score,
            aligned_query: self.aligned_query.clone(),
            aligned_subject: self.aligned_subject.clone(),
            gaps: self.gap_count,
            mismatches: self.mismatch_count,
            query_start: self.query_start,
            subject_start: self.subject_start,
        }
    }

    /// Reverse the traceback buffers into reading order and recount errors.
    pub(crate) fn finish(&mut self) {
        self.aligned_query.reverse();
        self.aligned_subject.reverse();
        let (gaps, mismatches) = count_errors(&self.aligned_query, &self.aligned_subject);
        self.gap_count = gaps;
        self.mismatch_count = mismatches;
    }

    /// Check the aligned buffers have the same length.
    pub(crate) fn check_lengths(&self) -> Result<()> {
        if self.aligned_query.len() != self.aligned_subject.len() {
            return Err(PalError::UnequalLength {
                query: self.aligned_query.len(),
                subject: self.aligned_subject.len(),
            });
        }
        Ok(())
    }

    /// Midline symbol for one column. Residue pairs go through the
    /// substitution matrix, so an out-of-alphabet byte is an error.
    fn match_symbol(&self, q: u8, s: u8) -> Result<char> {
        if q == b'-' || s == b'-' {
            Ok(' ')
        } else if q == s {
            Ok('|')
        } else if self.scores.score(q, s)? > 0.0 {
            Ok(':')
        } else {
            Ok(' ')
        }
    }
}

/// Push the column produced by one traceback move out of `(i, j)` and return
/// the cell it leads to.
#[inline]
pub(crate) fn push_step(
    step: Step,
    (i, j): (usize, usize),
    query: &[u8],
    subject: &[u8],
    aligned_query: &mut Vec<u8>,
    aligned_subject: &mut Vec<u8>,
) -> (usize, usize) {
    match step {
        Step::Up => {
            aligned_query.push(query[i - 1]);
            aligned_subject.push(b'-');
            (i - 1, j)
        }
        Step::Left => {
            aligned_query.push(b'-');
            aligned_subject.push(subject[j - 1]);
            (i, j - 1)
        }
        Step::Diagonal => {
            aligned_query.push(query[i - 1]);
            aligned_subject.push(subject[j - 1]);
            (i - 1, j - 1)
        }
    }
}

/// Count gap columns and mismatch columns. Residues compare case-sensitively.
pub(crate) fn count_errors(aligned_query: &[u8], aligned_subject: &[u8]) -> (usize, usize) {
    let mut gaps = 0;
    let mut mismatches = 0;
    for (&q, &s) in aligned_query.iter().zip(aligned_subject) {
        if q == b'-' || s == b'-' {
            gaps += 1;
        } else if q != s {
            mismatches += 1;
        }
    }
    (gaps, mismatches)
}

fn residue_count(column: &[u8]) -> usize {
    column.iter().filter(|&&c| c != b'-').count()
}

impl<T: Sequence + Annotated + ?Sized> Scored for Alignment<'_, T> {
    fn score(&self) -> f64 {
        self.score
    }
}

impl<T: Sequence + Annotated + ?Sized> fmt::Display for Alignment<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ql = self.query.len();
        let sl = self.subject_length;
        let errors = self.gap_count + self.mismatch_count;

        let mut head = String::new();
        head.push_str(&format!(
            "Query\t{}\t({} {})\n",
            self.query.header(),
            ql,
            plural("residue", "s", ql)
        ));
        head.push_str(&format!(
            "Subject\t{}\t({} {})\n",
            self.subject.header(),
            sl,
            plural("residue", "s", sl)
        ));
        head.push_str(&format!("Score\t{}\n", format_g(self.score, None)));
        head.push_str(&format!(
            "{}\t{} ({} {}, {} {})\n",
            plural("Error", "s", errors),
            errors,
            self.gap_count,
            plural("gap", "s", self.gap_count),
            self.mismatch_count,
            plural("mismatch", "es", self.mismatch_count)
        ));
        f.write_str(&elastic_tabs(&head, 1, 1))?;

        let mut body = String::new();
        let mut qs = self.query_start;
        let mut ss = self.subject_start;
        let chunks = self
            .aligned_query
            .chunks(self.line_length)
            .zip(self.aligned_subject.chunks(self.line_length));
        for (q, s) in chunks {
            let nr = residue_count(q);
            let start = if nr > 0 { qs + 1 } else { qs };
            body.push_str(&format!(
                "\n\nQuery\t{}\t{}\t{}\n",
                start,
                String::from_utf8_lossy(q),
                qs + nr
            ));
            qs += nr;

            let matches = q
                .iter()
                .zip(s)
                .map(|(&qc, &sc)| self.match_symbol(qc, sc))
                .collect::<Result<String>>()
                .map_err(|_| fmt::Error)?;
            body.push_str(&format!("\t\t{}\n", matches));

            let nr = residue_count(s);
            let start = if nr > 0 { ss + 1 } else { ss };
            body.push_str(&format!(
                "Subject\t{}\t{}\t{}\n",
                start,
                String::from_utf8_lossy(s),
                ss + nr
            ));
            ss += nr;
        }
        f.write_str(&elastic_tabs(&body, 1, 1))?;
        f.write_str("//")
    }
}
