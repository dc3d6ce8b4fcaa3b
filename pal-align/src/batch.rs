//! Batch pairwise alignment over many independent sequence pairs.
//!
//! Each pair gets its own DP matrix; the substitution matrix is shared. With
//! the `parallel` feature the pairs are spread over the rayon thread pool.

use pal_core::{Annotated, Result, Sequence};

use crate::scoring::{GapPenalties, SubstitutionMatrix};
use crate::types::{AlignmentMode, AlignmentSummary};

/// Align a batch of sequence pairs with the given mode and scoring.
///
/// Results come back in input order. Local mode reports the best local
/// alignment of each pair.
///
/// # Errors
///
/// Returns the first error of any individual alignment.
pub fn align_batch<T>(
    pairs: &[(T, T)],
    mode: AlignmentMode,
    scores: &SubstitutionMatrix,
    gaps: GapPenalties,
) -> Result<Vec<AlignmentSummary>>
where
    T: Sequence + Annotated + Sync,
{
    log::debug!("aligning batch of {} pairs ({} mode)", pairs.len(), mode);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        pairs
            .par_iter()
            .map(|(query, subject)| crate::align(query, subject, mode, scores, gaps))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    pairs
        .iter()
        .map(|(query, subject)| crate::align(query, subject, mode, scores, gaps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::SeqRecord;

    fn dna_pairs() -> Vec<(SeqRecord, SeqRecord)> {
        vec![
            (SeqRecord::new("a", "ACGT"), SeqRecord::new("b", "ACGT")),
            (SeqRecord::new("c", "AAAA"), SeqRecord::new("d", "TTTT")),
            (SeqRecord::new("e", "ACGT"), SeqRecord::new("f", "ACT")),
        ]
    }

    #[test]
    fn batch_multiple_pairs() {
        let m = SubstitutionMatrix::new(2.0, -1.0);
        let results =
            align_batch(&dna_pairs(), AlignmentMode::Global, &m, GapPenalties::default()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].score, 8.0); // perfect match
        assert_eq!(results[1].score, -4.0); // all mismatches
        assert_eq!(results[0].mode, AlignmentMode::Global);
    }

    #[test]
    fn batch_local_mode() {
        let pairs = vec![(
            SeqRecord::new("q", "AAACGTAAA"),
            SeqRecord::new("s", "TTTCGTTTT"),
        )];
        let m = SubstitutionMatrix::new(2.0, -1.0);
        let results =
            align_batch(&pairs, AlignmentMode::Local, &m, GapPenalties::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 6.0);
        assert_eq!(results[0].aligned_query, b"CGT");
        assert_eq!(results[0].query_start, 3);
    }

    #[test]
    fn batch_overlap_mode() {
        let pairs = vec![(SeqRecord::new("q", "ACGT"), SeqRecord::new("s", "GGGGACGT"))];
        let m = SubstitutionMatrix::new(1.0, -3.0);
        let results =
            align_batch(&pairs, AlignmentMode::Overlap, &m, GapPenalties::default()).unwrap();
        assert_eq!(results[0].score, 4.0);
        assert_eq!(results[0].gaps, 4);
    }

    #[test]
    fn empty_batch() {
        let pairs: Vec<(SeqRecord, SeqRecord)> = vec![];
        let m = SubstitutionMatrix::default();
        let results =
            align_batch(&pairs, AlignmentMode::Global, &m, GapPenalties::default()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn batch_propagates_errors() {
        let pairs = vec![(SeqRecord::new("q", "AC!T"), SeqRecord::new("s", "ACGT"))];
        let m = SubstitutionMatrix::default();
        assert!(align_batch(&pairs, AlignmentMode::Global, &m, GapPenalties::default()).is_err());
    }
}
