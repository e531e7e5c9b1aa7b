//! Filigrane Core
//!
//! Bibliothèque d'insertion et d'extraction de filigranes textuels dans des
//! séquences ADN annotées: codec texte/triplets, chiffrement restreint à l'alphabet
//! du codec, épissage avec réindexation des annotations, enveloppes GenBank/JSON et
//! index de détection de contrefaçon.

pub mod cipher;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod infringement;
pub mod logging;
pub mod record;
pub mod sequence;
pub mod watermark;

// Réexportations principales
pub use cipher::{AlphabetCipher, EncryptionScheme, PasswordPolicy, Salt};
pub use codec::{decode_fragment, encode_text, Codon};
pub use config::WatermarkConfig;
pub use envelope::{format_sequence, Envelope, GenBankEnvelope, JsonEnvelope, RecordFormat};
pub use error::{EnvelopeError, Result, WatermarkError};
pub use infringement::{find_sequence_match, InfringementMatch, StoredWatermark, WatermarkIndex};
pub use logging::{init_logging, init_logging_with};
pub use record::{AnnotatedRecord, Feature, Interval, Qualifiers, RecordHeader, Reference, Strand};
pub use sequence::{gc_ratio, Nucleotide};
pub use watermark::{
    Algorithm, ExtractRequest, InsertRequest, Insertion, PositionStrategy, WatermarkExtractor,
    WatermarkInfo, WatermarkInserter,
};
// Les macros log_operation et log_error sont exportées à la racine du crate
