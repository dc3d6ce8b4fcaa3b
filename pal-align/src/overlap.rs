//! Overlap (semi-global) alignment with affine gap penalties.
//!
//! Gaps before the first and after the last residue of either sequence are
//! free: the boundary is all zeros and the alignment may end anywhere on the
//! last row or column. Overhangs are emitted verbatim against gaps, so the
//! raw alignment always spans both full sequences; [`trim_query`] cuts the
//! flanks that lie outside the query.
//!
//! [`trim_query`]: OverlapAlignment::trim_query

use core::fmt;
use core::ops::{Deref, DerefMut};

use pal_core::{Annotated, Result, Sequence};

use crate::alignment::{push_step, Alignment};
use crate::scoring::SubstitutionMatrix;
use crate::types::AlignmentMode;

/// End-gap-free alignment of two overlapping sequences.
#[derive(Debug)]
pub struct OverlapAlignment<'a, T: ?Sized> {
    inner: Alignment<'a, T>,
    solved: bool,
}

impl<'a, T: Sequence + Annotated + ?Sized> OverlapAlignment<'a, T> {
    /// Allocate the DP matrix for `query` against `subject`.
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
                AlignmentMode::Overlap,
                query,
                subject,
                scores,
                gap_open,
                gap_extend,
            )?,
            solved: false,
        })
    }

    /// Fill the matrix, pick the best end cell on the last row or column and
    /// trace back. Calling it again leaves the first result in place.
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
        let (m, n) = (q.len(), s.len());

        a.table.fill(q, s, a.scores, a.gaps, false)?;

        // The last row is scanned first and keeps its first maximum; a cell
        // of the last column replaces it only when strictly better.
        let mut best = f64::NEG_INFINITY;
        let (mut i, mut j) = (m, 0);
        for k in 0..=n {
            let v = a.table[(m, k)].v;
            if best < v {
                best = v;
                j = k;
            }
        }
        for k in 0..=m {
            let v = a.table[(k, n)].v;
            if best < v {
                best = v;
                i = k;
                j = n;
            }
        }
        a.score = best;
        log::debug!(
            "overlap end cell ({}, {}) of ({}, {}), score {}",
            i,
            j,
            m,
            n,
            best
        );

        let (qa, sa) = (&mut a.aligned_query, &mut a.aligned_subject);
        for k in (i + 1..=m).rev() {
            qa.push(q[k - 1]);
            sa.push(b'-');
        }
        for k in (j + 1..=n).rev() {
            qa.push(b'-');
            sa.push(s[k - 1]);
        }

        let mut cell = (i, j);
        while cell.0 > 0 && cell.1 > 0 {
            let step = a.table[cell].step();
            cell = push_step(step, cell, q, s, qa, sa);
        }

        let (i, j) = cell;
        for k in (1..=i).rev() {
            qa.push(q[k - 1]);
            sa.push(b'-');
        }
        for k in (1..=j).rev() {
            qa.push(b'-');
            sa.push(s[k - 1]);
        }
        a.finish();

        self.solved = true;
        Ok(())
    }

    /// Remove leading and trailing columns where the query is a gap.
    ///
    /// Every removed leading column advances the subject start by one, and
    /// every removed column lowers the gap count by one. The score is left
    /// alone. Trimming twice is the same as trimming once.
    ///
    /// # Errors
    ///
    /// Returns [`PalError::UnequalLength`](pal_core::PalError::UnequalLength)
    /// if the aligned buffers differ in length.
    pub fn trim_query(&mut self) -> Result<()> {
        let a = &mut self.inner;
        a.check_lengths()?;

        let lead = a
            .aligned_query
            .iter()
            .take_while(|&&c| c == b'-')
            .count();
        let trail = a.aligned_query[lead..]
            .iter()
            .rev()
            .take_while(|&&c| c == b'-')
            .count();

        let end = a.aligned_query.len() - trail;
        a.aligned_query.truncate(end);
        a.aligned_subject.truncate(end);
        a.aligned_query.drain(..lead);
        a.aligned_subject.drain(..lead);

        a.subject_start += lead;
        a.gap_count -= lead + trail;
        log::trace!("trimmed {} leading and {} trailing query gaps", lead, trail);
        Ok(())
    }
}

impl<'a, T: ?Sized> Deref for OverlapAlignment<'a, T> {
    type Target = Alignment<'a, T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: ?Sized> DerefMut for OverlapAlignment<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Sequence + Annotated + ?Sized> fmt::Display for OverlapAlignment<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
