//! Core trait definitions for the pal crates.
//!
//! These traits define the contracts that sequence and result types implement.

/// A biological sequence (DNA, RNA, protein, etc.).
pub trait Sequence {
    /// The raw byte representation of the sequence.
    fn as_bytes(&self) -> &[u8];

    /// Length in residues/bases.
    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the sequence is empty.
    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

/// A type that carries annotations (names, descriptions, metadata).
pub trait Annotated {
    /// A human-readable name or identifier.
    fn name(&self) -> &str;

    /// An optional description.
    fn description(&self) -> Option<&str> {
        None
    }

    /// The full header line: the name, followed by the description if there is one.
    fn header(&self) -> String {
        match self.description() {
            Some(desc) if !desc.is_empty() => format!("{} {}", self.name(), desc),
            _ => self.name().to_string(),
        }
    }
}

/// A type that carries a numeric score (alignment score, quality, etc.).
pub trait Scored {
    /// The score value.
    fn score(&self) -> f64;
}

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}
