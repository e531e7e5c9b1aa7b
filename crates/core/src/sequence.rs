//! Bases nucléotidiques et normalisation des séquences

use crate::error::{Result, WatermarkError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base nucléotidique standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nucleotide {
    A, // Adénine
    C, // Cytosine
    G, // Guanine
    T, // Thymine
}

impl Nucleotide {
    /// Les quatre bases, dans l'ordre alphabétique
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

    /// Convertit un caractère (insensible à la casse) en base
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Nucleotide::A),
            'C' => Ok(Nucleotide::C),
            'G' => Ok(Nucleotide::G),
            'T' => Ok(Nucleotide::T),
            _ => Err(WatermarkError::InvalidBase(c)),
        }
    }

    /// Convertit une base en caractère majuscule
    pub fn as_char(self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::T => 'T',
        }
    }

    /// Tire une base uniformément
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Nucleotide {
    type Error = WatermarkError;

    fn try_from(c: char) -> Result<Self> {
        Nucleotide::from_char(c)
    }
}

/// Met une séquence sous forme canonique (majuscules, ACGT uniquement).
///
/// Les blancs et les chiffres sont ignorés, ce qui permet de passer directement
/// le contenu d'un bloc ORIGIN GenBank.
pub fn normalize_sequence(raw: &str) -> Result<String> {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_digit())
        .map(|c| Nucleotide::from_char(c).map(Nucleotide::as_char))
        .collect()
}

/// Vérifie qu'une séquence ne contient que des bases ACGT (toute casse)
pub fn is_nucleotide_sequence(seq: &str) -> bool {
    seq.chars().all(|c| Nucleotide::from_char(c).is_ok())
}

/// Ratio GC d'une séquence (0 pour une séquence vide)
pub fn gc_ratio(seq: &str) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc = seq
        .chars()
        .filter(|c| matches!(c.to_ascii_uppercase(), 'G' | 'C'))
        .count();
    gc as f64 / seq.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_char_is_case_insensitive() {
        assert_eq!(Nucleotide::from_char('a').unwrap(), Nucleotide::A);
        assert_eq!(Nucleotide::from_char('T').unwrap(), Nucleotide::T);
        assert!(matches!(
            Nucleotide::from_char('N'),
            Err(WatermarkError::InvalidBase('N'))
        ));
    }

    #[test]
    fn test_normalize_origin_block() {
        let origin = "        1 atgcgt acgt\n       11 ggcc";
        assert_eq!(normalize_sequence(origin).unwrap(), "ATGCGTACGTGGCC");
    }

    #[test]
    fn test_normalize_rejects_iupac() {
        assert!(normalize_sequence("ACGTN").is_err());
    }

    #[test]
    fn test_gc_ratio() {
        assert_eq!(gc_ratio(""), 0.0);
        assert!((gc_ratio("GCAT") - 0.5).abs() < f64::EPSILON);
    }
}
