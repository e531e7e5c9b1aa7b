//! Traces textuelles d'un filigrane: caractéristique `watermark` et bloc de commentaire

use super::{Algorithm, WatermarkInfo};
use crate::cipher::{EncryptionScheme, Salt};
use crate::error::{Result, WatermarkError};
use crate::record::{Feature, Interval};
use regex::Regex;
use std::sync::LazyLock;

/// Type de la caractéristique de filigrane
pub const WATERMARK_KIND: &str = "watermark";

pub const QUALIFIER_NOTE: &str = "note";
pub const QUALIFIER_ALGORITHM: &str = "algorithm";
/// Ancien nom du qualificatif d'algorithme, accepté en lecture
pub const QUALIFIER_LEGACY_ALGORITHM: &str = "watermark_type";
pub const QUALIFIER_SCHEME: &str = "encryption_scheme";
pub const QUALIFIER_SALT: &str = "salt";
pub const QUALIFIER_ROUNDS: &str = "kdf_rounds";

/// En-tête du bloc de commentaire
pub const COMMENT_HEADER: &str = "DNA watermark information:";

// Les blancs sont libres: un bloc relu depuis GenBank peut avoir été replié
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DNA\s+watermark\s+information:").unwrap());
static POSITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Position:\s*(\d+)\.\.(\d+)").unwrap());
static SEQUENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Sequence:\s*([ACGTacgt]+\b(?:\s+[ACGTacgt]+\b)*)").unwrap());
static ALGORITHM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Algorithm:\s*([A-Za-z]+)").unwrap());
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Scheme:\s*([A-Za-z_-]+)").unwrap());
static SALT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Salt:\s*([0-9A-Fa-f]+)").unwrap());
static ROUNDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Rounds:\s*(\d+)").unwrap());

fn parse_rounds(value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| WatermarkError::InvalidRounds(value.to_string()))
}

/// Lignes de note communes à la caractéristique et au commentaire
fn summary_lines(info: &WatermarkInfo) -> [String; 3] {
    [
        format!("Position: {}", info.position.one_based()),
        format!("Length: {} bp", info.len()),
        format!("Sequence: {}", info.sequence.to_lowercase()),
    ]
}

/// Construit la caractéristique `watermark` d'un filigrane inséré
pub fn watermark_feature(info: &WatermarkInfo) -> Feature {
    let mut feature = Feature::new(WATERMARK_KIND, info.position)
        .with_qualifier(QUALIFIER_NOTE, "DNA watermark sequence");
    for line in summary_lines(info) {
        feature.qualifiers.push(QUALIFIER_NOTE, line);
    }
    feature.qualifiers.push(QUALIFIER_ALGORITHM, info.algorithm.as_str());
    if let Some(scheme) = info.scheme {
        feature.qualifiers.push(QUALIFIER_SCHEME, scheme.as_str());
    }
    if let Some(salt) = info.salt {
        feature.qualifiers.push(QUALIFIER_SALT, salt.to_string());
    }
    if let Some(rounds) = info.kdf_rounds {
        feature.qualifiers.push(QUALIFIER_ROUNDS, rounds.to_string());
    }
    feature
}

/// Bloc ajouté au commentaire libre de l'enregistrement
pub fn comment_block(info: &WatermarkInfo) -> String {
    let mut block = format!("\n{}", COMMENT_HEADER);
    for line in summary_lines(info) {
        block.push_str("\n  ");
        block.push_str(&line);
    }
    block.push_str(&format!("\n  Algorithm: {}", info.algorithm));
    if let Some(scheme) = info.scheme {
        block.push_str(&format!("\n  Scheme: {}", scheme));
    }
    if let Some(salt) = info.salt {
        block.push_str(&format!("\n  Salt: {}", salt));
    }
    if let Some(rounds) = info.kdf_rounds {
        block.push_str(&format!("\n  Rounds: {}", rounds));
    }
    block
}

/// Marqueur de filigrane retrouvé dans un enregistrement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkMarker {
    pub interval: Interval,
    pub algorithm: Option<Algorithm>,
    pub scheme: Option<EncryptionScheme>,
    pub salt: Option<Salt>,
    pub kdf_rounds: Option<u32>,
    /// Fragment déclaré (commentaire uniquement)
    pub declared_sequence: Option<String>,
}

/// Lit le marqueur porté par une caractéristique `watermark`
pub fn marker_from_feature(feature: &Feature) -> Result<WatermarkMarker> {
    let q = &feature.qualifiers;
    let algorithm = q
        .first(QUALIFIER_ALGORITHM)
        .or_else(|| q.first(QUALIFIER_LEGACY_ALGORITHM))
        .map(str::parse::<Algorithm>)
        .transpose()?;
    let scheme = q
        .first(QUALIFIER_SCHEME)
        .map(str::parse::<EncryptionScheme>)
        .transpose()?;
    let salt = q.first(QUALIFIER_SALT).map(str::parse::<Salt>).transpose()?;
    let kdf_rounds = q.first(QUALIFIER_ROUNDS).map(parse_rounds).transpose()?;

    Ok(WatermarkMarker {
        interval: feature.interval,
        algorithm,
        scheme,
        salt,
        kdf_rounds,
        declared_sequence: None,
    })
}

/// Lit le dernier bloc de filigrane d'un commentaire libre
pub fn marker_from_comment(comment: &str) -> Result<Option<WatermarkMarker>> {
    let Some(header) = HEADER_RE.find_iter(comment).last() else {
        return Ok(None);
    };
    let block = &comment[header.end()..];

    let (Some(position), Some(sequence)) = (POSITION_RE.captures(block), SEQUENCE_RE.captures(block))
    else {
        return Ok(None);
    };

    // Les nombres sont bornés par la regex; un dépassement signale un commentaire corrompu
    let (Ok(start), Ok(end)) = (position[1].parse::<usize>(), position[2].parse::<usize>()) else {
        return Ok(None);
    };
    let interval = Interval::from_one_based(start, end)?;

    let algorithm = ALGORITHM_RE
        .captures(block)
        .map(|c| c[1].parse::<Algorithm>())
        .transpose()?;
    let scheme = SCHEME_RE
        .captures(block)
        .map(|c| c[1].parse::<EncryptionScheme>())
        .transpose()?;
    let salt = SALT_RE.captures(block).map(|c| c[1].parse::<Salt>()).transpose()?;
    let kdf_rounds = ROUNDS_RE.captures(block).map(|c| parse_rounds(&c[1])).transpose()?;

    let declared: String = sequence[1]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    Ok(Some(WatermarkMarker {
        interval,
        algorithm,
        scheme,
        salt,
        kdf_rounds,
        declared_sequence: Some(declared.to_uppercase()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> WatermarkInfo {
        WatermarkInfo {
            position: Interval::new(30, 36).unwrap(),
            sequence: "CGGCTA".into(),
            original_text: "HI".into(),
            algorithm: Algorithm::Plaintext,
            scheme: None,
            salt: None,
            kdf_rounds: None,
            password: None,
        }
    }

    #[test]
    fn test_feature_qualifiers() {
        let feature = watermark_feature(&info());
        assert_eq!(feature.kind, "watermark");
        assert_eq!(feature.interval, Interval::new(30, 36).unwrap());
        let notes = feature.qualifiers.get("note").unwrap();
        assert_eq!(notes.len(), 4);
        assert_eq!(notes[1], "Position: 31..36");
        assert_eq!(notes[2], "Length: 6 bp");
        assert_eq!(notes[3], "Sequence: cggcta");
        assert_eq!(feature.qualifiers.first("algorithm"), Some("plaintext"));
        assert!(feature.qualifiers.get("salt").is_none());
    }

    #[test]
    fn test_comment_block_roundtrip() {
        let mut info = info();
        info.algorithm = Algorithm::Encrypted;
        info.scheme = Some(EncryptionScheme::Salted);
        info.salt = Some(Salt::from_bytes([7; 16]));
        info.kdf_rounds = Some(120_000);

        let comment = format!("Original comment.{}", comment_block(&info));
        assert!(comment.contains("  Position: 31..36\n  Length: 6 bp\n  Sequence: cggcta"));

        let marker = marker_from_comment(&comment).unwrap().unwrap();
        assert_eq!(marker.interval, info.position);
        assert_eq!(marker.algorithm, Some(Algorithm::Encrypted));
        assert_eq!(marker.scheme, Some(EncryptionScheme::Salted));
        assert_eq!(marker.salt, info.salt);
        assert_eq!(marker.kdf_rounds, Some(120_000));
        assert_eq!(marker.declared_sequence.as_deref(), Some("CGGCTA"));
    }

    #[test]
    fn test_rounds_qualifier() {
        let mut info = info();
        info.algorithm = Algorithm::Encrypted;
        info.scheme = Some(EncryptionScheme::Salted);
        info.kdf_rounds = Some(250_000);
        let feature = watermark_feature(&info);
        assert_eq!(feature.qualifiers.first("kdf_rounds"), Some("250000"));
        assert_eq!(marker_from_feature(&feature).unwrap().kdf_rounds, Some(250_000));

        let broken = Feature::new("watermark", Interval::new(0, 6).unwrap())
            .with_qualifier("kdf_rounds", "many");
        assert!(matches!(
            marker_from_feature(&broken),
            Err(WatermarkError::InvalidRounds(_))
        ));
    }

    #[test]
    fn test_wrapped_comment_block() {
        let comment = "Host.\nDNA watermark\n information:\n  Position: 31..42\n  Length: 12 bp\n  Sequence: cggcta\n  cggcta\n  Algorithm: plaintext";
        let marker = marker_from_comment(comment).unwrap().unwrap();
        assert_eq!(marker.interval, Interval::new(30, 42).unwrap());
        assert_eq!(marker.algorithm, Some(Algorithm::Plaintext));
        assert_eq!(marker.declared_sequence.as_deref(), Some("CGGCTACGGCTA"));
    }

    #[test]
    fn test_comment_without_marker() {
        assert_eq!(marker_from_comment("just a comment").unwrap(), None);
        assert_eq!(
            marker_from_comment("DNA watermark information:\n  Length: 6 bp").unwrap(),
            None
        );
    }

    #[test]
    fn test_legacy_algorithm_qualifier() {
        let feature = Feature::new("watermark", Interval::new(0, 6).unwrap())
            .with_qualifier("watermark_type", "plaintext");
        let marker = marker_from_feature(&feature).unwrap();
        assert_eq!(marker.algorithm, Some(Algorithm::Plaintext));
    }

    #[test]
    fn test_invalid_qualifier_is_reported() {
        let feature = Feature::new("watermark", Interval::new(0, 6).unwrap())
            .with_qualifier("algorithm", "quantum");
        assert!(marker_from_feature(&feature).is_err());
    }
}
