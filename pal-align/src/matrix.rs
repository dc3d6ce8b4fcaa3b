//! The dynamic-programming matrix shared by all alignment modes.
//!
//! Each [`Cell`] holds the three Gotoh states and their maximum. The matrix
//! is `(m + 1) x (n + 1)` for a query of length `m` and a subject of length
//! `n`; row 0 and column 0 are boundary cells.

use core::ops::{Index, IndexMut};

use pal_core::Result;

use crate::render::{elastic_tabs, format_g};
use crate::scoring::{GapPenalties, SubstitutionMatrix};

/// One cell of the DP matrix.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Best score of an alignment ending with a query residue against a gap.
    pub e: f64,
    /// Best score of an alignment ending with a gap against a subject residue.
    pub f: f64,
    /// Best score of an alignment ending with a residue pair.
    pub g: f64,
    /// `max(e, f, g)`, floored at zero in local alignment.
    pub v: f64,
    /// Set once a local alignment has passed through this cell.
    pub visited: bool,
}

impl Cell {
    /// The traceback move out of this cell.
    ///
    /// `v` is compared against `e`, then `f`, then `g`, so ties prefer a gap
    /// in the subject over a gap in the query over a residue pair.
    #[inline]
    pub fn step(&self) -> Step {
        if self.v == self.e {
            Step::Up
        } else if self.v == self.f {
            Step::Left
        } else {
            Step::Diagonal
        }
    }
}

/// A single traceback move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Query residue against a gap; moves to `(i - 1, j)`.
    Up,
    /// Gap against a subject residue; moves to `(i, j - 1)`.
    Left,
    /// Residue pair; moves to `(i - 1, j - 1)`.
    Diagonal,
}

/// How [`DpMatrix::render`] shows each cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixView {
    /// The best score `v` of every cell.
    Scores,
    /// The traceback move out of every cell: `|` up, `-` left, `\` diagonal.
    /// Local cells clamped to zero show `*`.
    Traceback,
}

/// Dense `(m + 1) x (n + 1)` matrix of [`Cell`]s, stored row-major.
#[derive(Debug, Clone)]
pub struct DpMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl DpMatrix {
    /// A zeroed matrix with `rows x cols` cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
        }
    }

    /// Number of rows (`m + 1`).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (`n + 1`).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cell at `(i, j)`, if it exists.
    pub fn get(&self, i: usize, j: usize) -> Option<&Cell> {
        if i < self.rows && j < self.cols {
            self.cells.get(i * self.cols + j)
        } else {
            None
        }
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[Cell] {
        &self.cells[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over `(i, j, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(k, cell)| (k / cols, k % cols, cell))
    }

    /// Set the boundary for global alignment: leading gaps cost
    /// `open + k * extend`, and the states that cannot occur on the boundary
    /// are negative infinity.
    pub(crate) fn init_global(&mut self, gaps: GapPenalties) {
        self[(0, 0)] = Cell {
            e: f64::NEG_INFINITY,
            f: f64::NEG_INFINITY,
            g: 0.0,
            v: 0.0,
            visited: false,
        };
        for i in 1..self.rows {
            let e = gaps.open + i as f64 * gaps.extend;
            self[(i, 0)] = Cell {
                e,
                f: f64::NEG_INFINITY,
                g: f64::NEG_INFINITY,
                v: e,
                visited: false,
            };
        }
        for j in 1..self.cols {
            let f = gaps.open + j as f64 * gaps.extend;
            self[(0, j)] = Cell {
                e: f64::NEG_INFINITY,
                f,
                g: f64::NEG_INFINITY,
                v: f,
                visited: false,
            };
        }
    }

    /// Fill every interior cell with the affine-gap recurrence.
    ///
    /// With `local` set, `v` is clamped to a floor of zero.
    pub(crate) fn fill(
        &mut self,
        query: &[u8],
        subject: &[u8],
        scores: &SubstitutionMatrix,
        gaps: GapPenalties,
        local: bool,
    ) -> Result<()> {
        for i in 1..self.rows {
            for j in 1..self.cols {
                let up = self[(i - 1, j)];
                let left = self[(i, j - 1)];
                let diag = self[(i - 1, j - 1)];

                let e = up.e.max(up.v + gaps.open) + gaps.extend;
                let f = left.f.max(left.v + gaps.open) + gaps.extend;
                let g = diag.v + scores.score(query[i - 1], subject[j - 1])?;
                let mut v = e.max(f).max(g);
                if local {
                    v = v.max(0.0);
                }

                self[(i, j)] = Cell {
                    e,
                    f,
                    g,
                    v,
                    visited: false,
                };
            }
        }
        log::trace!("filled {}x{} matrix (local: {})", self.rows, self.cols, local);
        Ok(())
    }

    /// Render the matrix as a tab-aligned grid with query residues labelling
    /// the rows and subject residues labelling the columns.
    pub(crate) fn render(&self, query: &[u8], subject: &[u8], view: MatrixView) -> String {
        let mut text = String::from("\t");
        for &r in subject.iter().take(self.cols.saturating_sub(1)) {
            text.push('\t');
            text.push(r as char);
        }
        for i in 0..self.rows {
            text.push('\n');
            if i > 0 {
                text.push(query[i - 1] as char);
            }
            for (j, cell) in self.row(i).iter().enumerate() {
                text.push('\t');
                match view {
                    MatrixView::Scores => text.push_str(&format_g(cell.v, None)),
                    MatrixView::Traceback => text.push(traceback_symbol(i, j, cell)),
                }
            }
        }
        elastic_tabs(&text, 1, 1)
    }
}

fn traceback_symbol(i: usize, j: usize, cell: &Cell) -> char {
    match (i, j) {
        (0, 0) => ' ',
        (0, _) => '-',
        (_, 0) => '|',
        _ if cell.v != cell.e && cell.v != cell.f && cell.v != cell.g => '*',
        _ => match cell.step() {
            Step::Up => '|',
            Step::Left => '-',
            Step::Diagonal => '\\',
        },
    }
}

impl Index<(usize, usize)> for DpMatrix {
    type Output = Cell;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Cell {
        &self.cells[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for DpMatrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Cell {
        &mut self.cells[i * self.cols + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(query: &[u8], subject: &[u8], local: bool) -> DpMatrix {
        let gaps = GapPenalties::default();
        let scores = SubstitutionMatrix::new(1.0, -1.0);
        let mut p = DpMatrix::new(query.len() + 1, subject.len() + 1);
        if !local {
            p.init_global(gaps);
        }
        p.fill(query, subject, &scores, gaps, local).unwrap();
        p
    }

    #[test]
    fn global_boundary() {
        let p = filled(b"AC", b"ACG", false);
        assert_eq!(p.rows(), 3);
        assert_eq!(p.cols(), 4);
        assert_eq!(p[(0, 0)].v, 0.0);
        assert_eq!(p[(0, 0)].g, 0.0);
        assert_eq!(p[(0, 0)].e, f64::NEG_INFINITY);
        assert_eq!(p[(2, 0)].e, -9.0);
        assert_eq!(p[(2, 0)].v, -9.0);
        assert_eq!(p[(2, 0)].f, f64::NEG_INFINITY);
        assert_eq!(p[(0, 3)].f, -11.0);
        assert_eq!(p[(0, 3)].v, -11.0);
        assert_eq!(p[(0, 3)].g, f64::NEG_INFINITY);
    }

    #[test]
    fn interior_recurrence() {
        let p = filled(b"A", b"A", false);
        let c = p[(1, 1)];
        assert_eq!(c.g, 1.0);
        assert_eq!(c.e, -14.0);
        assert_eq!(c.f, -14.0);
        assert_eq!(c.v, 1.0);
        assert_eq!(c.step(), Step::Diagonal);
    }

    #[test]
    fn local_floor() {
        let p = filled(b"A", b"C", true);
        let c = p[(1, 1)];
        assert_eq!(c.g, -1.0);
        assert_eq!(c.v, 0.0);
        assert_eq!(p[(0, 1)], Cell::default());
    }

    #[test]
    fn step_tie_break_prefers_up_then_left() {
        let tie = Cell {
            e: 1.0,
            f: 1.0,
            g: 1.0,
            v: 1.0,
            visited: false,
        };
        assert_eq!(tie.step(), Step::Up);
        let tie = Cell {
            e: 0.0,
            f: 1.0,
            g: 1.0,
            v: 1.0,
            visited: false,
        };
        assert_eq!(tie.step(), Step::Left);
    }

    #[test]
    fn unknown_residue_aborts_fill() {
        let gaps = GapPenalties::default();
        let scores = SubstitutionMatrix::new(1.0, -1.0);
        let mut p = DpMatrix::new(2, 2);
        assert!(p.fill(b"A", b"@", &scores, gaps, false).is_err());
    }

    #[test]
    fn get_and_iter() {
        let p = filled(b"AC", b"A", false);
        assert!(p.get(2, 1).is_some());
        assert!(p.get(3, 0).is_none());
        assert!(p.get(0, 2).is_none());
        let cells: Vec<_> = p.iter().map(|(i, j, _)| (i, j)).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[3], (1, 1));
        assert_eq!(p.row(1).len(), 2);
    }

    #[test]
    fn render_scores() {
        let p = filled(b"A", b"A", false);
        assert_eq!(
            p.render(b"A", b"A", MatrixView::Scores),
            "     A\n  0  -7\nA -7 1"
        );
    }

    #[test]
    fn render_traceback() {
        let p = filled(b"A", b"A", false);
        assert_eq!(
            p.render(b"A", b"A", MatrixView::Traceback),
            "    A\n    -\nA | \\"
        );
        let p = filled(b"A", b"C", true);
        assert!(p.render(b"A", b"C", MatrixView::Traceback).ends_with('*'));
    }
}
