//! Enveloppes: lecture et écriture des enregistrements annotés
//!
//! Le cœur ne manipule que des `AnnotatedRecord`; une enveloppe fait le pont avec
//! un format textuel (GenBank, JSON).

pub mod genbank;
pub mod json;

pub use genbank::GenBankEnvelope;
pub use json::JsonEnvelope;

use crate::error::Result;
use crate::record::AnnotatedRecord;
use std::fmt;
use std::path::Path;

/// Bases par ligne dans la section ORIGIN
pub const BASES_PER_LINE: usize = 60;
/// Bases par bloc dans la section ORIGIN
pub const BASES_PER_BLOCK: usize = 10;

/// Format textuel d'un enregistrement annoté
pub trait Envelope {
    /// Lit un enregistrement
    fn parse(&self, input: &str) -> Result<AnnotatedRecord>;

    /// Écrit un enregistrement
    fn render(&self, record: &AnnotatedRecord) -> Result<String>;
}

/// Formats d'enveloppe connus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    GenBank,
    Json,
}

impl RecordFormat {
    /// Déduit le format de l'extension (`.json` sinon GenBank)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RecordFormat::Json,
            _ => RecordFormat::GenBank,
        }
    }

    pub fn parse(&self, input: &str) -> Result<AnnotatedRecord> {
        match self {
            RecordFormat::GenBank => GenBankEnvelope.parse(input),
            RecordFormat::Json => JsonEnvelope.parse(input),
        }
    }

    pub fn render(&self, record: &AnnotatedRecord) -> Result<String> {
        match self {
            RecordFormat::GenBank => GenBankEnvelope.render(record),
            RecordFormat::Json => JsonEnvelope.render(record),
        }
    }
}

/// Ligne de séquence mise en forme (position 1-based + blocs de 10 bases)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceLine {
    pub position: usize,
    pub blocks: String,
}

impl fmt::Display for SequenceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>9} {}", self.position, self.blocks)
    }
}

/// Découpe une séquence en lignes de 60 bases, par blocs de 10
pub fn format_sequence(sequence: &str) -> Vec<SequenceLine> {
    let bases = sequence.as_bytes();
    bases
        .chunks(BASES_PER_LINE)
        .enumerate()
        .map(|(i, line)| SequenceLine {
            position: i * BASES_PER_LINE + 1,
            blocks: line
                .chunks(BASES_PER_BLOCK)
                .map(|block| String::from_utf8_lossy(block).into_owned())
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sequence_layout() {
        let sequence: String = "acgt".repeat(20);
        let lines = format_sequence(&sequence);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].position, 1);
        assert_eq!(lines[1].position, 61);
        assert_eq!(lines[0].blocks.split(' ').count(), 6);
        assert_eq!(lines[1].blocks, "acgtacgtac gtacgtacgt");
        assert_eq!(lines[1].to_string(), "       61 acgtacgtac gtacgtacgt");
    }

    #[test]
    fn test_format_empty_sequence() {
        assert!(format_sequence("").is_empty());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(RecordFormat::from_path(Path::new("a/b.JSON")), RecordFormat::Json);
        assert_eq!(RecordFormat::from_path(Path::new("a/b.gb")), RecordFormat::GenBank);
        assert_eq!(RecordFormat::from_path(Path::new("record")), RecordFormat::GenBank);
    }
}
