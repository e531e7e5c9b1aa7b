//! Sous-commandes de la CLI

pub mod decode;
pub mod detect;
pub mod encode;
pub mod extract;
pub mod insert;
pub mod password;

use anyhow::{Context, Result};
use filigrane_core::{AnnotatedRecord, RecordFormat};
use std::path::Path;

/// Lit un enregistrement GenBank ou JSON selon l'extension
pub(crate) fn read_record(path: &Path) -> Result<AnnotatedRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Lecture impossible: {}", path.display()))?;
    let record = RecordFormat::from_path(path)
        .parse(&content)
        .with_context(|| format!("Enregistrement invalide: {}", path.display()))?;
    Ok(record)
}

/// Écrit un enregistrement dans le format déduit de l'extension
pub(crate) fn write_record(path: &Path, record: &AnnotatedRecord) -> Result<()> {
    let content = RecordFormat::from_path(path).render(record)?;
    std::fs::write(path, content)
        .with_context(|| format!("Écriture impossible: {}", path.display()))?;
    Ok(())
}
