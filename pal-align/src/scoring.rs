//! Scoring for pairwise alignment: residue substitution scores and affine
//! gap penalties.
//!
//! [`SubstitutionMatrix`] is a symmetric table over the fixed residue alphabet
//! [`ALPHABET`]. It can be built from match/mismatch constants, read from the
//! whitespace-delimited text format used by NCBI matrix files, or loaded from
//! the built-in BLOSUM62 data. [`GapPenalties`] carries the gap-open and
//! gap-extend costs.

use core::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use pal_core::{PalError, Result};

use crate::render::{elastic_tabs, format_g};

/// Residues known to every substitution matrix, in row/column order.
///
/// The 20 standard amino acids plus J (Leu/Ile), B (Asx), Z (Glx), X
/// (unknown), `*` (stop) and U (selenocysteine).
pub const ALPHABET: &[u8; 26] = b"ARNDCQEGHIJLKMFPSTWYVBZX*U";

const DIM: usize = ALPHABET.len();

const NO_RESIDUE: u8 = u8::MAX;

const fn build_residue_index() -> [u8; 256] {
    let mut table = [NO_RESIDUE; 256];
    let mut i = 0;
    while i < DIM {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static RESIDUE_INDEX: [u8; 256] = build_residue_index();

/// Maps a residue byte to its row/column, case-insensitively.
fn residue_index(residue: u8) -> Option<usize> {
    match RESIDUE_INDEX[residue.to_ascii_uppercase() as usize] {
        NO_RESIDUE => None,
        i => Some(i as usize),
    }
}

// ---------------------------------------------------------------------------
// Substitution matrix
// ---------------------------------------------------------------------------

/// A symmetric residue-pair scoring table.
///
/// Immutable once built; share it by reference between any number of
/// alignments, including across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct SubstitutionMatrix {
    scores: Vec<f64>,
}

impl SubstitutionMatrix {
    /// Create a matrix with `match_score` on the diagonal and
    /// `mismatch_score` everywhere else.
    pub fn new(match_score: f64, mismatch_score: f64) -> Self {
        let mut scores = vec![mismatch_score; DIM * DIM];
        for i in 0..DIM {
            scores[i * DIM + i] = match_score;
        }
        Self { scores }
    }

    /// BLOSUM62 as distributed by NCBI.
    ///
    /// J and U are absent from the NCBI table and keep the `new(1, -1)`
    /// defaults that apply to any residue missing from a parsed table.
    pub fn blosum62() -> Self {
        let mut m = Self::new(1.0, -1.0);
        for (r, &a) in BLOSUM62_ORDER.iter().enumerate() {
            for (c, &b) in BLOSUM62_ORDER.iter().enumerate() {
                if let (Some(i), Some(j)) = (residue_index(a), residue_index(b)) {
                    m.put(i, j, f64::from(BLOSUM62[r * BLOSUM62_ORDER.len() + c]));
                }
            }
        }
        m
    }

    /// Read a score table from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the table is malformed (see
    /// [`FromStr`](#impl-FromStr-for-SubstitutionMatrix)).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::parse_lines(BufReader::new(reader).lines().map(|l| l.map_err(PalError::from)))
    }

    /// Read a score table from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the table is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        log::debug!("reading substitution matrix from {}", path.display());
        Self::from_reader(file)
    }

    /// Score of the residue pair `(a, b)`, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`PalError::UnknownResidue`] if either byte is not in [`ALPHABET`].
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> Result<f64> {
        match (residue_index(a), residue_index(b)) {
            (Some(i), Some(j)) => Ok(self.scores[i * DIM + j]),
            _ => Err(PalError::UnknownResidue(a as char, b as char)),
        }
    }

    /// Set the score of `(a, b)` and `(b, a)`.
    fn set_score(&mut self, a: u8, b: u8, score: f64) -> Result<()> {
        match (residue_index(a), residue_index(b)) {
            (Some(i), Some(j)) => {
                self.put(i, j, score);
                Ok(())
            }
            _ => Err(PalError::UnknownResidue(a as char, b as char)),
        }
    }

    fn put(&mut self, i: usize, j: usize, score: f64) {
        self.scores[i * DIM + j] = score;
        self.scores[j * DIM + i] = score;
    }

    fn parse_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<S>>,
        S: AsRef<str>,
    {
        let mut m = Self::new(1.0, -1.0);
        let mut columns: Option<Vec<u8>> = None;

        for (line_num, line) in lines.into_iter().enumerate() {
            let line = line?;
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if columns.is_none() {
                columns = Some(
                    trimmed
                        .split_whitespace()
                        .map(|field| parse_residue(field, line_num + 1))
                        .collect::<Result<_>>()?,
                );
                continue;
            }
            let cols = columns.as_deref().unwrap_or_default();

            let mut fields = trimmed.split_whitespace();
            let row = match fields.next() {
                Some(field) => parse_residue(field, line_num + 1)?,
                None => continue,
            };
            let values: Vec<&str> = fields.collect();
            if values.len() != cols.len() {
                return Err(PalError::Parse(format!(
                    "line {}: expected {} scores for row '{}', found {}",
                    line_num + 1,
                    cols.len(),
                    row as char,
                    values.len()
                )));
            }
            for (&col, value) in cols.iter().zip(values) {
                let score: f64 = value.parse().map_err(|_| {
                    PalError::Parse(format!("line {}: invalid score '{}'", line_num + 1, value))
                })?;
                m.set_score(row, col, score)?;
            }
        }

        Ok(m)
    }
}

fn parse_residue(field: &str, line_num: usize) -> Result<u8> {
    match field.as_bytes() {
        [r] if residue_index(*r).is_some() => Ok(*r),
        _ => Err(PalError::Parse(format!(
            "line {}: '{}' is not a residue",
            line_num, field
        ))),
    }
}

impl Default for SubstitutionMatrix {
    fn default() -> Self {
        Self::new(1.0, -1.0)
    }
}

impl FromStr for SubstitutionMatrix {
    type Err = PalError;

    /// Parse a whitespace-delimited score table.
    ///
    /// Blank lines and lines starting with `#` are skipped. The first
    /// remaining line lists the column residues; every following line holds
    /// a row residue and one score per column. Pairs the table does not
    /// mention score 1 on the diagonal and -1 elsewhere.
    fn from_str(s: &str) -> Result<Self> {
        Self::parse_lines(s.lines().map(Ok))
    }
}

impl fmt::Display for SubstitutionMatrix {
    /// A tab-aligned grid: a header of residues, then one row per residue
    /// with scores in `%g` form to three significant digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::with_capacity(DIM * DIM * 4);
        for &r in ALPHABET {
            text.push_str(&format!("\t{:>2}", r as char));
        }
        text.push('\n');
        for (i, &r) in ALPHABET.iter().enumerate() {
            text.push(r as char);
            for j in 0..DIM {
                text.push_str(&format!("\t{:>2}", format_g(self.scores[i * DIM + j], Some(3))));
            }
            if i + 1 < DIM {
                text.push('\n');
            }
        }
        f.write_str(&elastic_tabs(&text, 1, 1))
    }
}

// ---------------------------------------------------------------------------
// Gap penalties
// ---------------------------------------------------------------------------

/// Affine gap costs: a run of `k` gaps costs `open + k * extend`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GapPenalties {
    pub open: f64,
    pub extend: f64,
}

impl GapPenalties {
    /// Create a gap model.
    ///
    /// # Errors
    ///
    /// Returns an error if either penalty is positive or not finite.
    pub fn new(open: f64, extend: f64) -> Result<Self> {
        if !open.is_finite() || open > 0.0 {
            return Err(PalError::InvalidInput(format!(
                "gap_open must be finite and non-positive, got {open}"
            )));
        }
        if !extend.is_finite() || extend > 0.0 {
            return Err(PalError::InvalidInput(format!(
                "gap_extend must be finite and non-positive, got {extend}"
            )));
        }
        Ok(Self { open, extend })
    }
}

impl Default for GapPenalties {
    fn default() -> Self {
        Self {
            open: -5.0,
            extend: -2.0,
        }
    }
}

// ===========================================================================
// NCBI substitution matrix data
// ===========================================================================

const BLOSUM62_ORDER: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

/// BLOSUM62, 24x24 flattened in [`BLOSUM62_ORDER`].
#[rustfmt::skip]
const BLOSUM62: [i8; 24 * 24] = [
//   A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];
