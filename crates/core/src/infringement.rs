//! Détection de contrefaçon: recherche des filigranes connus dans une séquence

use crate::error::{Result, WatermarkError};
use crate::record::{AnnotatedRecord, Interval};
use crate::watermark::WatermarkInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Cherche un fragment de filigrane dans une séquence cible (insensible à la casse)
pub fn find_sequence_match(target: &str, watermark: &str) -> Option<Interval> {
    if watermark.is_empty() {
        return None;
    }
    let start = target.to_lowercase().find(&watermark.to_lowercase())?;
    Some(Interval {
        start,
        end: start + watermark.len(),
    })
}

/// Filigrane enregistré dans l'index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWatermark {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub info: WatermarkInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

/// Correspondance trouvée dans une séquence cible
#[derive(Debug, Clone, Serialize)]
pub struct InfringementMatch<'a> {
    pub entry: &'a StoredWatermark,
    /// Position du fragment dans la séquence cible
    pub matched: Interval,
}

/// Index des filigranes émis, persisté en JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkIndex {
    entries: Vec<StoredWatermark>,
}

impl WatermarkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge un index depuis un fichier JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let index: Self = serde_json::from_str(&content)?;
        debug!(entries = index.len(), "Index chargé");
        Ok(index)
    }

    /// Charge un index, ou un index vide si le fichier n'existe pas
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Enregistre le filigrane d'un enregistrement filigrané.
    ///
    /// Le mot de passe éventuellement généré n'est pas conservé.
    pub fn register(&mut self, info: &WatermarkInfo, record: &AnnotatedRecord) -> Uuid {
        let id = Uuid::new_v4();
        let mut info = info.clone();
        info.password = None;

        self.entries.push(StoredWatermark {
            id,
            created_at: Utc::now(),
            info,
            accession: record.header.accession.clone(),
            organism: record.header.organism_name().map(str::to_string),
            definition: record.definition.clone(),
        });
        info!(%id, "Filigrane enregistré dans l'index");
        id
    }

    /// Filigranes connus présents dans une séquence
    pub fn find(&self, sequence: &str) -> Result<Vec<InfringementMatch<'_>>> {
        let target: String = sequence.chars().filter(|c| !c.is_whitespace()).collect();
        if target.is_empty() {
            return Err(WatermarkError::EmptySequence);
        }

        let matches: Vec<_> = self
            .entries
            .iter()
            .filter_map(|entry| {
                find_sequence_match(&target, &entry.info.sequence)
                    .map(|matched| InfringementMatch { entry, matched })
            })
            .collect();

        info!(
            candidates = self.entries.len(),
            matches = matches.len(),
            "Recherche de contrefaçon terminée"
        );
        Ok(matches)
    }

    pub fn get(&self, id: &Uuid) -> Option<&StoredWatermark> {
        self.entries.iter().find(|entry| entry.id == *id)
    }

    pub fn entries(&self) -> &[StoredWatermark] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watermark::Algorithm;

    fn info(sequence: &str) -> WatermarkInfo {
        WatermarkInfo {
            position: Interval::new(30, 30 + sequence.len()).unwrap(),
            sequence: sequence.to_string(),
            original_text: "HI".into(),
            algorithm: Algorithm::Plaintext,
            scheme: None,
            salt: None,
            kdf_rounds: None,
            password: Some("generated".into()),
        }
    }

    fn record() -> AnnotatedRecord {
        let mut record = AnnotatedRecord::new("P1", "ACGT");
        record.definition = Some("Test plasmid, with watermark, complete cds.".into());
        record.header.accession = Some("XY000042".into());
        record.header.organism = Some("Escherichia coli\nBacteria; Enterobacterales.".into());
        record
    }

    #[test]
    fn test_find_sequence_match() {
        let matched = find_sequence_match("ttttcggctaaaa", "CGGCTA").unwrap();
        assert_eq!(matched, Interval::new(4, 10).unwrap());
        assert_eq!(matched.one_based().to_string(), "5..10");
        assert_eq!(find_sequence_match("AAAA", "CGGCTA"), None);
        assert_eq!(find_sequence_match("AAAA", ""), None);
    }

    #[test]
    fn test_register_and_find() {
        let mut index = WatermarkIndex::new();
        let id = index.register(&info("CGGCTA"), &record());
        index.register(&info("GGGGGGAAA"), &record());

        let stored = index.get(&id).unwrap();
        assert_eq!(stored.accession.as_deref(), Some("XY000042"));
        assert_eq!(stored.organism.as_deref(), Some("Escherichia coli"));
        assert_eq!(stored.info.password, None);

        let matches = index.find("ACGT CGGCTA ACGT").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entry.id, id);
        assert_eq!(matches[0].matched, Interval::new(4, 10).unwrap());
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let index = WatermarkIndex::new();
        assert!(matches!(index.find("  \n"), Err(WatermarkError::EmptySequence)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut index = WatermarkIndex::load_or_default(&path).unwrap();
        assert!(index.is_empty());
        index.register(&info("CGGCTA"), &record());
        index.save(&path).unwrap();

        let loaded = WatermarkIndex::load(&path).unwrap();
        assert_eq!(loaded, index);
    }
}
