//! Moteur d'insertion
//!
//! Le fragment encodé est épissé au point d'insertion et toutes les caractéristiques
//! situées en aval sont réindexées. L'enregistrement d'entrée n'est jamais modifié.

use super::annotation::{comment_block, watermark_feature};
use super::{Algorithm, PositionStrategy, WatermarkInfo};
use crate::cipher::{
    generate_noise_fragment_with, generate_password, random_noise_length, AlphabetCipher,
    AuthenticatedCipher, EncryptionScheme, Salt, SubstitutionCipher,
};
use crate::codec;
use crate::config::WatermarkConfig;
use crate::error::{Result, WatermarkError};
use crate::log_operation;
use crate::record::{AnnotatedRecord, Feature, Interval, Reference};
use crate::sequence::Nucleotide;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static REFERENCE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bases\s+\d+\s+to\s+\d+").unwrap());

/// Paramètres d'une insertion
#[derive(Debug, Clone, Default)]
pub struct InsertRequest {
    pub text: String,
    pub algorithm: Algorithm,
    pub strategy: PositionStrategy,
    /// Région d'intérêt (typiquement la CDS)
    pub region: Option<Interval>,
    /// Mot de passe; généré si absent en mode chiffré
    pub password: Option<String>,
    /// Convention de chiffrement; celle de la configuration si absente
    pub scheme: Option<EncryptionScheme>,
}

impl InsertRequest {
    /// Insertion en clair
    pub fn plaintext(text: impl Into<String>, strategy: PositionStrategy, region: Interval) -> Self {
        Self {
            text: text.into(),
            algorithm: Algorithm::Plaintext,
            strategy,
            region: Some(region),
            ..Default::default()
        }
    }

    /// Passe en mode chiffré avec un mot de passe optionnel
    pub fn encrypted(mut self, password: Option<String>) -> Self {
        self.algorithm = Algorithm::Encrypted;
        self.password = password;
        self
    }

    pub fn with_scheme(mut self, scheme: EncryptionScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }
}

/// Résultat d'une insertion: nouvel enregistrement et description du filigrane
#[derive(Debug, Clone)]
pub struct Insertion {
    pub record: AnnotatedRecord,
    pub info: WatermarkInfo,
}

/// Fragment encodé prêt à l'épissage
struct EncodedPayload {
    fragment: String,
    scheme: Option<EncryptionScheme>,
    salt: Option<Salt>,
    kdf_rounds: Option<u32>,
    generated_password: Option<String>,
}

/// Moteur d'insertion de filigranes
#[derive(Debug, Clone, Default)]
pub struct WatermarkInserter {
    config: WatermarkConfig,
}

impl WatermarkInserter {
    pub fn new(config: WatermarkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Insère un filigrane (bruit cosmétique tiré de `thread_rng`)
    pub fn insert(&self, record: &AnnotatedRecord, request: &InsertRequest) -> Result<Insertion> {
        self.insert_with_rng(record, request, &mut rand::thread_rng())
    }

    /// Insère un filigrane avec un générateur explicite pour le bruit
    pub fn insert_with_rng<R: Rng + ?Sized>(
        &self,
        record: &AnnotatedRecord,
        request: &InsertRequest,
        rng: &mut R,
    ) -> Result<Insertion> {
        log_operation!("watermark_insert", {
            self.validate_payload(&request.text)?;
            validate_host(record)?;

            let region = request.region.ok_or(WatermarkError::MissingRegion)?;
            if !region.fits(record.len()) {
                return Err(WatermarkError::RegionOutOfBounds {
                    start: region.start,
                    end: region.end,
                    len: record.len(),
                });
            }

            let insert_position = request.strategy.insert_position(region);
            let payload = self.encode_payload(request, rng)?;
            let length = payload.fragment.len();
            let position = Interval::new(insert_position, insert_position + length)?;

            debug!(
                strategy = %request.strategy,
                algorithm = %request.algorithm,
                position = %position.one_based(),
                "Point d'insertion calculé"
            );

            let info = WatermarkInfo {
                position,
                sequence: payload.fragment,
                original_text: request.text.clone(),
                algorithm: request.algorithm,
                scheme: payload.scheme,
                salt: payload.salt,
                kdf_rounds: payload.kdf_rounds,
                password: payload.generated_password,
            };

            let record = splice_record(record, &info, region);

            info!(
                length,
                position = %info.position.one_based(),
                "Filigrane inséré"
            );

            Ok(Insertion { record, info })
        })
    }

    fn validate_payload(&self, text: &str) -> Result<()> {
        let len = text.chars().count();
        if len == 0 {
            return Err(WatermarkError::EmptyPayload);
        }
        if len > self.config.max_payload_len {
            return Err(WatermarkError::PayloadTooLong {
                len,
                max: self.config.max_payload_len,
            });
        }
        Ok(())
    }

    fn encode_payload<R: Rng + ?Sized>(
        &self,
        request: &InsertRequest,
        rng: &mut R,
    ) -> Result<EncodedPayload> {
        if request.algorithm == Algorithm::Plaintext {
            return Ok(EncodedPayload {
                fragment: codec::encode_text(&request.text)?,
                scheme: None,
                salt: None,
                kdf_rounds: None,
                generated_password: None,
            });
        }

        let (password, generated_password) = match &request.password {
            Some(password) => (password.clone(), None),
            None => {
                let generated =
                    generate_password(self.config.password_length, self.config.password_policy);
                (generated.clone(), Some(generated))
            }
        };
        let scheme = request.scheme.unwrap_or(self.config.default_scheme);
        if scheme.is_legacy() {
            warn!(scheme = %scheme, "Convention historique choisie pour un nouveau filigrane");
        }

        let (fragment, salt) = match scheme {
            EncryptionScheme::Salted => {
                let cipher = AuthenticatedCipher::with_random_salt(&password, self.config.kdf_rounds)?;
                let fragment = codec::encode_text(&cipher.encrypt(&request.text)?)?;
                (fragment, Some(cipher.salt()))
            }
            EncryptionScheme::NoiseWrapped => {
                let cipher = AuthenticatedCipher::legacy(&password, self.config.kdf_rounds)?;
                let body = codec::encode_text(&cipher.encrypt(&request.text)?)?;
                let prefix = random_noise_length(rng, self.config.noise_min, self.config.noise_max);
                let suffix = random_noise_length(rng, self.config.noise_min, self.config.noise_max);
                let fragment = format!(
                    "{}{}{}",
                    generate_noise_fragment_with(rng, prefix),
                    body,
                    generate_noise_fragment_with(rng, suffix)
                );
                (fragment, None)
            }
            EncryptionScheme::Substitution => {
                let cipher = SubstitutionCipher::new(&password)?;
                (codec::encode_text(&cipher.encrypt(&request.text)?)?, None)
            }
        };

        let kdf_rounds = (scheme != EncryptionScheme::Substitution).then_some(self.config.kdf_rounds);

        Ok(EncodedPayload {
            fragment,
            scheme: Some(scheme),
            salt,
            kdf_rounds,
            generated_password,
        })
    }
}

/// Refuse une séquence hôte hors ACGT avant tout découpage
fn validate_host(record: &AnnotatedRecord) -> Result<()> {
    match record.sequence.chars().find(|c| Nucleotide::from_char(*c).is_err()) {
        Some(c) => Err(WatermarkError::InvalidBase(c)),
        None => Ok(()),
    }
}

/// Réindexe un intervalle après l'insertion de `length` bases en `insert_position`.
///
/// Un intervalle débutant au point d'insertion ou après est décalé en bloc; un
/// intervalle qui le chevauche (ou se termine dessus) ne voit que sa fin décalée.
pub fn reindex_interval(interval: Interval, insert_position: usize, length: usize) -> Interval {
    if interval.start >= insert_position {
        Interval {
            start: interval.start + length,
            end: interval.end + length,
        }
    } else if interval.end >= insert_position {
        Interval {
            start: interval.start,
            end: interval.end + length,
        }
    } else {
        interval
    }
}

/// Construit l'enregistrement filigrané à partir de l'original
fn splice_record(record: &AnnotatedRecord, info: &WatermarkInfo, region: Interval) -> AnnotatedRecord {
    let insert_position = info.position.start;
    let length = info.len();

    let mut sequence = String::with_capacity(record.sequence.len() + length);
    sequence.push_str(&record.sequence[..insert_position]);
    sequence.push_str(&info.sequence);
    sequence.push_str(&record.sequence[insert_position..]);

    let mut features = Vec::with_capacity(record.features.len() + 1);
    features.push(watermark_feature(info));
    features.extend(record.features.iter().map(|feature| {
        let mut feature: Feature = feature.clone();
        // La région elle-même garde sa longueur quand le filigrane la suit immédiatement
        let is_region_followed = feature.interval == region && region.end == insert_position;
        if !is_region_followed {
            feature.interval = reindex_interval(feature.interval, insert_position, length);
        }
        compact_translation(&mut feature);
        feature
    }));

    let comment = record
        .comment
        .as_ref()
        .map(|comment| format!("{}{}", comment, comment_block(info)));

    let definition = record.definition.as_ref().map(|definition| {
        if definition.to_lowercase().contains("complete cds") && !definition.contains("with watermark") {
            definition.replacen("complete cds", "with watermark, complete cds", 1)
        } else {
            definition.clone()
        }
    });

    let mut header = record.header.clone();
    for reference in &mut header.references {
        update_reference_span(reference, sequence.len());
    }

    AnnotatedRecord {
        name: record.name.clone(),
        definition,
        sequence,
        features,
        comment,
        header,
    }
}

/// Les plages `bases N to M` d'une référence couvrent désormais toute la séquence
fn update_reference_span(reference: &mut Reference, len: usize) {
    let span = format!("bases 1 to {}", len);
    for text in [&mut reference.description, &mut reference.title] {
        let updated = REFERENCE_SPAN_RE.replace_all(text.as_str(), span.as_str()).into_owned();
        *text = updated;
    }
}

/// Supprime les blancs des traductions protéiques
fn compact_translation(feature: &mut Feature) {
    for (key, values) in feature.qualifiers.iter_mut() {
        if key == "translation" {
            for value in values.iter_mut() {
                value.retain(|c| !c.is_whitespace());
            }
        }
    }
}
