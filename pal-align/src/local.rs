//! Local (Smith-Waterman) alignment with ranked, non-overlapping
//! suboptimal alignments.
//!
//! The recurrence is the same as for global alignment on a zero boundary,
//! with every `v` clamped to zero. Repeated calls to
//! [`align`](LocalAlignment::align) walk a list of start cells in order of
//! descending score and return the next alignment that shares no DP cell
//! with any alignment returned before (Waterman-Eggert style).

use core::fmt;
use core::ops::{Deref, DerefMut};

use pal_core::{Annotated, Result, Sequence};

use crate::alignment::{push_step, Alignment};
use crate::scoring::SubstitutionMatrix;
use crate::types::{AlignmentMode, Coordinate};

/// Where the suboptimal search stands between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalState {
    /// The matrix has not been filled yet.
    Unstarted,
    /// The best alignment has been searched for.
    FirstScan,
    /// All remaining cells have been ranked by score.
    Ranked,
    /// No further non-overlapping alignment exists.
    Exhausted,
}

/// Local alignment returning the best and then successively worse
/// non-overlapping alignments.
///
/// ```
/// use pal_align::{LocalAlignment, SeqRecord, SubstitutionMatrix};
///
/// let q = SeqRecord::new("q", "GGGGACGTACGTGGGG");
/// let s = SeqRecord::new("s", "TTACGTACGTTT");
/// let m = SubstitutionMatrix::new(1.0, -3.0);
///
/// let mut a = LocalAlignment::new(&q, &s, &m, -5.0, -2.0).unwrap();
/// assert!(a.align().unwrap());
/// assert_eq!(a.raw_alignment().0, b"ACGTACGT");
/// assert_eq!(a.query_start(), 4);
/// ```
#[derive(Debug)]
pub struct LocalAlignment<'a, T: ?Sized> {
    inner: Alignment<'a, T>,
    state: LocalState,
    candidates: Vec<Coordinate>,
}

impl<'a, T: Sequence + Annotated + ?Sized> LocalAlignment<'a, T> {
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
                AlignmentMode::Local,
                query,
                subject,
                scores,
                gap_open,
                gap_extend,
            )?,
            state: LocalState::Unstarted,
            candidates: Vec::new(),
        })
    }

    /// Current position of the suboptimal search.
    pub fn state(&self) -> LocalState {
        self.state
    }

    /// Find the next best local alignment that does not touch any cell used
    /// by a previous one.
    ///
    /// Returns `Ok(false)` once no such alignment is left; the previous
    /// result is then kept as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if a residue of either sequence is not in the
    /// substitution matrix alphabet.
    pub fn align(&mut self) -> Result<bool> {
        match self.state {
            LocalState::Unstarted => {
                self.fill()?;
                self.candidates = self.best_cell().into_iter().collect();
                self.state = LocalState::FirstScan;
            }
            LocalState::FirstScan => {
                self.rank_cells();
                self.state = LocalState::Ranked;
            }
            LocalState::Ranked => {}
            LocalState::Exhausted => return Ok(false),
        }

        if self.search() {
            Ok(true)
        } else {
            log::debug!("local search exhausted");
            self.candidates.clear();
            self.state = LocalState::Exhausted;
            Ok(false)
        }
    }

    fn fill(&mut self) -> Result<()> {
        let a = &mut self.inner;
        let (query, subject) = (a.query, a.subject);
        a.table
            .fill(query.as_bytes(), subject.as_bytes(), a.scores, a.gaps, true)
    }

    /// The first interior cell, in row-major order, holding the maximum score.
    fn best_cell(&self) -> Option<Coordinate> {
        let mut best: Option<Coordinate> = None;
        for (i, j, cell) in self.inner.table.iter() {
            if i == 0 || j == 0 {
                continue;
            }
            if best.map_or(true, |b| b.score < cell.v) {
                best = Some(Coordinate {
                    i,
                    j,
                    score: cell.v,
                });
            }
        }
        best
    }

    /// Collect every unvisited interior cell, best first. Equal scores keep
    /// row-major order.
    fn rank_cells(&mut self) {
        self.candidates = self
            .inner
            .table
            .iter()
            .filter(|&(i, j, cell)| i > 0 && j > 0 && !cell.visited)
            .map(|(i, j, cell)| Coordinate {
                i,
                j,
                score: cell.v,
            })
            .collect();
        self.candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        log::debug!("ranked {} candidate start cells", self.candidates.len());
    }

    /// Trace back from the candidates in order until one path reaches a zero
    /// cell without crossing a visited cell.
    fn search(&mut self) -> bool {
        let a = &mut self.inner;
        let (query, subject) = (a.query, a.subject);
        let (q, s) = (query.as_bytes(), subject.as_bytes());
        let mut aligned_query = Vec::new();
        let mut aligned_subject = Vec::new();
        let mut found = None;

        for (k, c) in self.candidates.iter().enumerate() {
            if c.score <= 0.0 {
                break;
            }
            if a.table[(c.i, c.j)].visited {
                continue;
            }

            aligned_query.clear();
            aligned_subject.clear();
            let mut cell = (c.i, c.j);
            let mut collided = false;
            while a.table[cell].v > 0.0 {
                a.table[cell].visited = true;
                let step = a.table[cell].step();
                cell = push_step(step, cell, q, s, &mut aligned_query, &mut aligned_subject);
                if a.table[cell].visited {
                    collided = true;
                    break;
                }
            }
            if collided {
                log::trace!("start ({}, {}) runs into an earlier alignment", c.i, c.j);
                continue;
            }

            a.aligned_query = std::mem::take(&mut aligned_query);
            a.aligned_subject = std::mem::take(&mut aligned_subject);
            a.score = c.score;
            a.query_start = cell.0;
            a.subject_start = cell.1;
            a.finish();
            log::debug!(
                "local alignment from ({}, {}) to ({}, {}), score {}",
                cell.0,
                cell.1,
                c.i,
                c.j,
                c.score
            );
            found = Some(k);
            break;
        }

        match found {
            Some(k) => {
                self.candidates.drain(..=k);
                true
            }
            None => false,
        }
    }
}

impl<'a, T: ?Sized> Deref for LocalAlignment<'a, T> {
    type Target = Alignment<'a, T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T: ?Sized> DerefMut for LocalAlignment<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Sequence + Annotated + ?Sized> fmt::Display for LocalAlignment<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
