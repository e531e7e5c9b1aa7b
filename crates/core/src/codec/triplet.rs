//! Codec caractère <-> triplet de bases

use super::table;
use crate::error::{Result, WatermarkError};
use crate::sequence::Nucleotide;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Triplet de bases, unité atomique du codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codon([Nucleotide; 3]);

impl Codon {
    /// Lit un codon de 3 caractères (insensible à la casse)
    pub fn parse(s: &str) -> Result<Self> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 3 {
            return Err(WatermarkError::UnknownCodon(s.to_string()));
        }
        let mut bases = [Nucleotide::A; 3];
        for (slot, c) in bases.iter_mut().zip(chars) {
            *slot = Nucleotide::from_char(c)
                .map_err(|_| WatermarkError::UnknownCodon(s.to_string()))?;
        }
        Ok(Self(bases))
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.0 {
            write!(f, "{}", base)?;
        }
        Ok(())
    }
}

impl FromStr for Codon {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self> {
        Codon::parse(s)
    }
}

impl Serialize for Codon {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Codon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Codon::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Table construite une seule fois pour tout le processus
struct CodonTable {
    encode: HashMap<char, Codon>,
    decode: HashMap<Codon, char>,
    alphabet: Vec<char>,
}

impl CodonTable {
    fn build() -> Self {
        let mut encode = HashMap::new();
        let mut decode = HashMap::new();
        let mut alphabet = Vec::new();

        for (c, code) in table::entries() {
            if let Ok(codon) = Codon::parse(code) {
                encode.insert(c, codon);
                decode.insert(codon, c);
                alphabet.push(c);
            }
        }

        Self { encode, decode, alphabet }
    }
}

static TABLE: LazyLock<CodonTable> = LazyLock::new(CodonTable::build);

/// Encode un caractère (replié en majuscule) en codon
pub fn encode_char(c: char) -> Result<Codon> {
    let upper = c.to_ascii_uppercase();
    TABLE
        .encode
        .get(&upper)
        .copied()
        .ok_or(WatermarkError::UnsupportedCharacter(c))
}

/// Décode un codon textuel en caractère
pub fn decode_codon(codon: &str) -> Result<char> {
    let parsed = Codon::parse(codon)?;
    TABLE
        .decode
        .get(&parsed)
        .copied()
        .ok_or_else(|| WatermarkError::UnknownCodon(codon.to_string()))
}

/// Encode un texte en fragment nucléotidique (majuscules)
pub fn encode_text(text: &str) -> Result<String> {
    let mut fragment = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        fragment.push_str(&encode_char(c)?.to_string());
    }
    Ok(fragment)
}

/// Décode un fragment dont la longueur est un multiple de 3
pub fn decode_fragment(seq: &str) -> Result<String> {
    let chars: Vec<char> = seq.chars().collect();
    if chars.len() % 3 != 0 {
        return Err(WatermarkError::InvalidLength(chars.len()));
    }

    chars
        .chunks(3)
        .map(|triplet| decode_codon(&triplet.iter().collect::<String>()))
        .collect()
}

/// Vrai si le triplet appartient à la table
pub fn is_valid_codon(codon: &str) -> bool {
    decode_codon(codon).is_ok()
}

/// Ensemble de tous les codons attribués
pub fn all_valid_codons() -> BTreeSet<Codon> {
    TABLE.decode.keys().copied().collect()
}

/// Alphabet supporté, dans l'ordre canonique de la table
pub fn supported_alphabet() -> &'static [char] {
    &TABLE.alphabet
}

/// Vrai si le caractère (replié en majuscule) est encodable
pub fn is_supported(c: char) -> bool {
    TABLE.encode.contains_key(&c.to_ascii_uppercase())
}

/// Détail caractère par caractère d'un encodage
pub fn codon_details(text: &str) -> Result<Vec<(char, Codon)>> {
    text.chars().map(|c| Ok((c, encode_char(c)?))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_complete() {
        assert_eq!(supported_alphabet().len(), 49);
        assert_eq!(all_valid_codons().len(), 49);
    }

    #[test]
    fn test_table_avoids_start_codons() {
        for start in table::START_CODONS {
            assert!(!is_valid_codon(start), "{} ne doit pas être attribué", start);
        }
        for stop in table::STOP_CODONS {
            assert!(is_valid_codon(stop), "{} doit être réutilisé", stop);
        }
    }

    #[test]
    fn test_encode_char_folds_case() {
        assert_eq!(encode_char('h').unwrap().to_string(), "CGG");
        assert_eq!(encode_char(' ').unwrap().to_string(), "AAA");
    }

    #[test]
    fn test_encode_char_rejects_unsupported() {
        assert!(matches!(
            encode_char('é'),
            Err(WatermarkError::UnsupportedCharacter('é'))
        ));
        assert!(matches!(
            encode_char('\n'),
            Err(WatermarkError::UnsupportedCharacter('\n'))
        ));
    }

    #[test]
    fn test_bijection() {
        for &c in supported_alphabet() {
            let codon = encode_char(c).unwrap();
            assert_eq!(decode_codon(&codon.to_string()).unwrap(), c);
        }
    }

    #[test]
    fn test_decode_codon_is_case_insensitive() {
        assert_eq!(decode_codon("cgg").unwrap(), 'H');
        assert!(matches!(decode_codon("ATG"), Err(WatermarkError::UnknownCodon(_))));
        assert!(matches!(decode_codon("AT"), Err(WatermarkError::UnknownCodon(_))));
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("HI").unwrap(), "CGGCTA");
        assert_eq!(encode_text("").unwrap(), "");
        assert!(encode_text("ok#").is_err());
    }

    #[test]
    fn test_decode_fragment_length() {
        for bad in ["A", "AC", "ACCA", "ACCAG"] {
            assert!(matches!(
                decode_fragment(bad),
                Err(WatermarkError::InvalidLength(_))
            ));
        }
        assert_eq!(decode_fragment("").unwrap(), "");
    }

    #[test]
    fn test_decode_fragment_stops_on_unknown_codon() {
        let err = decode_fragment("CGGATGCTA").unwrap_err();
        assert!(matches!(err, WatermarkError::UnknownCodon(ref c) if c == "ATG"));
    }

    #[test]
    fn test_codon_details() {
        let details = codon_details("a1").unwrap();
        assert_eq!(details[0].0, 'a');
        assert_eq!(details[0].1.to_string(), "ACC");
        assert_eq!(details[1].1.to_string(), "ACG");
    }
}
