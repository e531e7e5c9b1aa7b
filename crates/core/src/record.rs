//! Modèle d'enregistrement annoté (séquence + caractéristiques + commentaire)

use crate::error::{Result, WatermarkError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intervalle demi-ouvert `[start, end)` en coordonnées 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    /// Crée un intervalle, `start <= end`
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(WatermarkError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Intervalle depuis des bornes 1-based inclusives (`start..end` GenBank)
    pub fn from_one_based(start: usize, end: usize) -> Result<Self> {
        if start == 0 {
            return Err(WatermarkError::InvalidInterval { start, end });
        }
        Self::new(start - 1, end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Vrai si l'intervalle tient dans une séquence de longueur `len`
    pub fn fits(&self, len: usize) -> bool {
        self.end <= len
    }

    /// Vue 1-based (`start+1..end`) pour l'affichage
    pub fn one_based(&self) -> OneBased {
        OneBased(*self)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Affichage 1-based inclusif d'un intervalle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneBased(pub Interval);

impl fmt::Display for OneBased {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.0.start + 1, self.0.end)
    }
}

/// Brin d'une caractéristique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

/// Qualificatifs ordonnés: chaque clé porte une liste ordonnée de valeurs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Qualifiers(Vec<(String, Vec<String>)>);

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une valeur à la clé (créée en fin de liste si absente)
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.0.push((key, vec![value.into()])),
        }
    }

    /// Remplace toutes les valeurs d'une clé
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.0.push((key, values)),
        }
    }

    /// Retire une clé et ses valeurs
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Première valeur d'une clé
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Vec<String>)> {
        self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Annotation localisée sur la séquence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Type de la caractéristique (`CDS`, `gene`, `watermark`, ...)
    pub kind: String,
    pub interval: Interval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strand: Option<Strand>,
    #[serde(default, skip_serializing_if = "Qualifiers::is_empty")]
    pub qualifiers: Qualifiers,
}

impl Feature {
    pub fn new(kind: impl Into<String>, interval: Interval) -> Self {
        Self {
            kind: kind.into(),
            interval,
            strand: None,
            qualifiers: Qualifiers::new(),
        }
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.push(key, value);
        self
    }

    /// Vrai si le type, normalisé (casse, blancs), vaut `kind`
    pub fn is_kind(&self, kind: &str) -> bool {
        let normalized: String = self
            .kind
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        normalized == kind.to_lowercase()
    }
}

/// Référence bibliographique d'un enregistrement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// Ligne REFERENCE (numéro et plage de bases)
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consortium: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubmed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Métadonnées d'en-tête conservées d'une lecture à l'écriture
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordHeader {
    /// Type de molécule LOCUS (`DNA`, `mRNA`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub molecule_type: Option<String>,
    pub circular: bool,
    /// Division GenBank (`SYN`, `BCT`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
    /// Date LOCUS, `JJ-MMM-AAAA`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Organisme, suivi éventuellement de sa lignée sur les lignes suivantes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organism: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

impl RecordHeader {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Nom de l'organisme, sans la lignée taxonomique
    pub fn organism_name(&self) -> Option<&str> {
        self.organism
            .as_deref()
            .and_then(|organism| organism.lines().next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Enregistrement annoté fourni et repris par la couche d'enveloppe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    /// Nom du locus
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Séquence canonique (majuscules)
    pub sequence: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "RecordHeader::is_empty")]
    pub header: RecordHeader,
}

impl AnnotatedRecord {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Sous-séquence `[start, end)`
    pub fn slice(&self, interval: Interval) -> Result<&str> {
        if !interval.fits(self.sequence.len()) {
            return Err(WatermarkError::RegionOutOfBounds {
                start: interval.start,
                end: interval.end,
                len: self.sequence.len(),
            });
        }
        Ok(&self.sequence[interval.start..interval.end])
    }

    /// Première caractéristique du type donné
    pub fn find_feature(&self, kind: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.is_kind(kind))
    }
}
