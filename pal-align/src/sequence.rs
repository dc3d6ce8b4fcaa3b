//! A minimal named sequence to feed the aligners.

use pal_core::{Annotated, Sequence};

/// A named residue sequence with an optional description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    name: String,
    description: Option<String>,
    residues: Vec<u8>,
}

impl SeqRecord {
    /// Create a record from a name and its residues.
    pub fn new(name: impl Into<String>, residues: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            residues: residues.into(),
        }
    }

    /// Attach a free-text description (the rest of a FASTA header line).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Sequence for SeqRecord {
    fn as_bytes(&self) -> &[u8] {
        &self.residues
    }
}

impl Annotated for SeqRecord {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
