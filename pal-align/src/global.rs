//! Global (Needleman-Wunsch) alignment with affine gap penalties.
//!
//! Uses Gotoh's three-state formulation. Leading gaps are charged like any
//! other gap, so the boundary cells hold `open + k * extend`, and the
//! traceback runs from `(m, n)` all the way back to `(0, 0)`.

use core::fmt;
use core::ops::{Deref, DerefMut};

use pal_core::{Annotated, Result, Sequence};

use crate::alignment::{push_step, Alignment};
use crate::scoring::SubstitutionMatrix;
use crate::types::AlignmentMode;

/// End-to-end alignment of two sequences.
///
/// ```
/// use pal_align::{GlobalAlignment, SeqRecord, SubstitutionMatrix};
///
/// let q = SeqRecord::new("q", "MKFLALF");
/// let s = SeqRecord::new("s", "MKYLILLF");
/// let blosum = SubstitutionMatrix::blosum62();
///
/// let mut a = GlobalAlignment::new(&q, &s, &blosum, -5.0, -2.0).unwrap();
/// a.align().unwrap();
/// assert_eq!(a.score(), 19.0);
/// assert_eq!(a.raw_alignment(), (&b"MKFLAL-F"[..], &b"MKYLILLF"[..]));
/// ```
#[derive(Debug)]
pub struct GlobalAlignment<'a, T: ?Sized> {
    inner: Alignment<'a, T>,
    solved: bool,
}

impl<'a, T: Sequence + Annotated + ?Sized> GlobalAlignment<'a, T> {
    /// Allocate the DP matrix for `query` against `subject`. Nothing is
    /// computed until [`align`](Self::align).
    ///
    /// # Errors
    ///
    /// Returns an error if either gap penalty is positive or not finite.
    pub fn new(
        query: &'a T,
        subject: &'a T,
        scores: &'a SubstitutionMatrix,
        gap_open: f64,
        gap_extend: f64,
    ) -> Result<Self> {
        Ok(Self {
            inner: Alignment::new(
                AlignmentMode::Global,
                query,
                subject,
                scores,
                gap_open,
                gap_extend,
            )?,
            solved: false,
        })
    }

    /// Fill the matrix and trace back the optimal alignment. Calling it
    /// again leaves the first result in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a residue of either sequence is not in the
    /// substitution matrix alphabet.
    pub fn align(&mut self) -> Result<()> {
        if self.solved {
            return Ok(());
        }
        let a = &mut self.inner;
        let (query, subject) = (a.query, a.subject);
        let (q, s) = (query.as_bytes(), subject.as_bytes());

        a.table.init_global(a.gaps);
        a.table.fill(q, s, a.scores, a.gaps, false)?;

        let mut cell = (q.len(), s.len());
        a.score = a.table[cell].v;
        while cell.0 > 0 || cell.1 > 0 {
            let step = a.table[cell].step();
            cell = push_step(step, cell, q, s, &mut a.aligned_query, &mut a.aligned_subject);
        }
        a.finish();
        log::debug!(
            "global alignment: score {}, {} columns",
            a.score,
            a.aligned_query.len()
        );

        self.solved = true;
        Ok(())
    }
}

impl<'a, T: ?Sized> Deref for GlobalAlignment<'a, T> {
    type Target = Alignment<'a, T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: ?Sized> DerefMut for GlobalAlignment<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Sequence + Annotated + ?Sized> fmt::Display for GlobalAlignment<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::count_errors;
    use crate::matrix::MatrixView;
    use crate::sequence::SeqRecord;
    use pal_core::PalError;

    fn rescore(qa: &[u8], sa: &[u8], m: &SubstitutionMatrix, open: f64, extend: f64) -> f64 {
        let mut score = 0.0;
        let mut in_gap: Option<bool> = None;
        for (&q, &s) in qa.iter().zip(sa) {
            if q == b'-' || s == b'-' {
                let query_gap = q == b'-';
                if in_gap != Some(query_gap) {
                    score += open;
                }
                score += extend;
                in_gap = Some(query_gap);
            } else {
                score += m.score(q, s).unwrap();
                in_gap = None;
            }
        }
        score
    }

    #[test]
    fn protein_regression() {
        let q = SeqRecord::new("Q", "MKFLALF");
        let s = SeqRecord::new("S", "MKYLILLF");
        let m = SubstitutionMatrix::blosum62();
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();

        assert_eq!(a.score(), 19.0);
        let (qa, sa) = a.raw_alignment();
        assert_eq!(qa, b"MKFLAL-F");
        assert_eq!(sa, b"MKYLILLF");
        assert_eq!(a.gaps(), 1);
        assert_eq!(a.mismatches(), 2);
        assert_eq!(rescore(qa, sa, &m, -5.0, -2.0), 19.0);
        assert_eq!(a.score(), a.dp_matrix()[(7, 8)].v);
    }

    #[test]
    fn protein_rendering() {
        let q = SeqRecord::new("Q", "MKFLALF");
        let s = SeqRecord::new("S", "MKYLILLF");
        let m = SubstitutionMatrix::blosum62();
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();

        assert_eq!(
            a.to_string(),
            "Query   Q (7 residues)\n\
             Subject S (8 residues)\n\
             Score   19\n\
             Errors  3 (1 gap, 2 mismatches)\n\
             \n\
             \n\
             Query   1 MKFLAL-F 7\n          \
             ||:| | |\n\
             Subject 1 MKYLILLF 8\n\
             //"
        );
    }

    #[test]
    fn rendering_wraps_lines() {
        let q = SeqRecord::new("Q", "MKFLALF");
        let s = SeqRecord::new("S", "MKYLILLF");
        let m = SubstitutionMatrix::blosum62();
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();
        a.set_line_length(3);

        let expected = [
            "Query   Q (7 residues)",
            "Subject S (8 residues)",
            "Score   19",
            "Errors  3 (1 gap, 2 mismatches)",
            "",
            "",
            "Query   1 MKF 3",
            "          ||:",
            "Subject 1 MKY 3",
            "",
            "",
            "Query   4 LAL 6",
            "          | |",
            "Subject 4 LIL 6",
            "",
            "",
            "Query   7 -F 7",
            "           |",
            "Subject 7 LF 8",
            "//",
        ]
        .join("\n");
        assert_eq!(a.to_string(), expected);
    }

    #[test]
    fn subject_offset_and_length() {
        let q = SeqRecord::new("Q", "ACGT");
        let s = SeqRecord::new("S", "ACGT");
        let m = SubstitutionMatrix::new(1.0, -3.0);
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();
        a.set_subject_start(100);
        a.set_subject_length(1000);

        let text = a.to_string();
        assert!(text.contains("Subject S (1000 residues)"));
        assert!(text.contains("Subject 101 ACGT 104"));
        assert!(text.contains("Query   1   ACGT 4"));
    }

    #[test]
    fn second_align_keeps_result() {
        let q = SeqRecord::new("Q", "MKFLALF");
        let s = SeqRecord::new("S", "MKYLILLF");
        let m = SubstitutionMatrix::blosum62();
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();
        a.align().unwrap();
        assert_eq!(a.raw_alignment().0, b"MKFLAL-F");
        assert_eq!(a.score(), 19.0);
    }

    #[test]
    fn empty_query_is_all_gaps() {
        let q = SeqRecord::new("Q", Vec::<u8>::new());
        let s = SeqRecord::new("S", "ACG");
        let m = SubstitutionMatrix::new(1.0, -1.0);
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();
        assert_eq!(a.raw_alignment(), (&b"---"[..], &b"ACG"[..]));
        assert_eq!(a.score(), -11.0);
        assert_eq!(a.gaps(), 3);
    }

    #[test]
    fn unknown_residue_is_an_error() {
        let q = SeqRecord::new("Q", "AC1");
        let s = SeqRecord::new("S", "ACG");
        let m = SubstitutionMatrix::new(1.0, -1.0);
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        assert!(matches!(a.align(), Err(PalError::UnknownResidue(..))));
    }

    #[test]
    fn lowercase_residues_score_like_uppercase() {
        let q = SeqRecord::new("Q", "acgt");
        let s = SeqRecord::new("S", "ACGT");
        let m = SubstitutionMatrix::new(1.0, -3.0);
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();
        assert_eq!(a.score(), 4.0);
        // Counting stays byte-exact.
        assert_eq!(a.mismatches(), 4);
        assert_eq!(count_errors(b"acgt", b"ACGT"), (0, 4));
    }

    #[test]
    fn print_matrix_views() {
        let q = SeqRecord::new("Q", "A");
        let s = SeqRecord::new("S", "A");
        let m = SubstitutionMatrix::new(1.0, -1.0);
        let mut a = GlobalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
        a.align().unwrap();
        assert_eq!(a.print_matrix(MatrixView::Scores), "     A\n  0  -7\nA -7 1");
        assert_eq!(a.print_matrix(MatrixView::Traceback), "    A\n    -\nA | \\");
    }
}
