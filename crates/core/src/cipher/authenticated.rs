//! Chiffrement authentifié (PBKDF2-HMAC-SHA256 + AES-256-GCM)
//!
//! Jeton binaire: `nonce (12) || texte chiffré || tag (16)`, encodé en base64url
//! sans padding. Le texte est ensuite blindé pour tenir dans l'alphabet du codec:
//! `-` devient `.`, `_` devient `/`, et chaque minuscule est écrite `!` + majuscule
//! car le codec replie la casse.

use super::AlphabetCipher;
use crate::error::{Result, WatermarkError};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

/// Taille du sel en octets
pub const SALT_LEN: usize = 16;

/// Nombre d'itérations PBKDF2 par défaut
pub const DEFAULT_KDF_ROUNDS: u32 = 100_000;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Marqueur de minuscule dans le texte blindé
const LOWERCASE_ESCAPE: char = '!';

/// Sel fixe de la convention historique `NoiseWrapped`
const LEGACY_SALT: [u8; SALT_LEN] = *b"filigrane-legacy";

/// Sel de dérivation de clé
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Tire un sel depuis le générateur du système
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Sel fixe de la convention historique
    pub fn legacy() -> Self {
        Self(LEGACY_SALT)
    }

    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Salt {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim()).map_err(|e| WatermarkError::InvalidSalt(e.to_string()))?;
        let bytes: [u8; SALT_LEN] = bytes.try_into().map_err(|v: Vec<u8>| {
            WatermarkError::InvalidSalt(format!("{} octets au lieu de {}", v.len(), SALT_LEN))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Salt {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Chiffre AEAD dont la clé est dérivée une seule fois à la construction
pub struct AuthenticatedCipher {
    cipher: Aes256Gcm,
    salt: Salt,
}

impl AuthenticatedCipher {
    /// Dérive la clé depuis le mot de passe et le sel
    pub fn new(password: &str, salt: Salt, rounds: u32) -> Result<Self> {
        if password.is_empty() {
            return Err(WatermarkError::MissingPassword);
        }

        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), rounds.max(1), &mut key);

        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key)),
            salt,
        })
    }

    /// Chiffre avec un sel neuf
    pub fn with_random_salt(password: &str, rounds: u32) -> Result<Self> {
        Self::new(password, Salt::random(), rounds)
    }

    /// Chiffre de la convention historique (sel fixe)
    pub fn legacy(password: &str, rounds: u32) -> Result<Self> {
        Self::new(password, Salt::legacy(), rounds)
    }

    pub fn salt(&self) -> Salt {
        self.salt
    }
}

impl AlphabetCipher for AuthenticatedCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| WatermarkError::EncryptionFailed)?;

        let mut token = Vec::with_capacity(NONCE_LEN + sealed.len());
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&sealed);

        Ok(armor(&URL_SAFE_NO_PAD.encode(token)))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let encoded = unarmor(ciphertext)?;
        // Le moteur NO_PAD accepte directement l'entrée sans `=`
        let token = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| WatermarkError::DecryptionFailed)?;

        if token.len() < NONCE_LEN + TAG_LEN {
            return Err(WatermarkError::DecryptionFailed);
        }

        let (nonce, sealed) = token.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| WatermarkError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| WatermarkError::DecryptionFailed)
    }
}

/// Blinde un texte base64url pour l'alphabet du codec
pub fn armor(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len() * 2);
    for c in encoded.chars() {
        match c {
            '-' => out.push('.'),
            '_' => out.push('/'),
            c if c.is_ascii_lowercase() => {
                out.push(LOWERCASE_ESCAPE);
                out.push(c.to_ascii_uppercase());
            }
            '=' => {}
            c => out.push(c),
        }
    }
    out
}

/// Inverse de `armor`; échoue sur un échappement orphelin
pub fn unarmor(armored: &str) -> Result<String> {
    let mut out = String::with_capacity(armored.len());
    let mut chars = armored.chars();
    while let Some(c) = chars.next() {
        match c {
            LOWERCASE_ESCAPE => match chars.next() {
                Some(next) if next.is_ascii_alphabetic() => out.push(next.to_ascii_lowercase()),
                _ => return Err(WatermarkError::DecryptionFailed),
            },
            '.' => out.push('-'),
            '/' => out.push('_'),
            c => out.push(c),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    const ROUNDS: u32 = 16;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = AuthenticatedCipher::with_random_salt("s3cret", ROUNDS).unwrap();
        let sealed = cipher.encrypt("Hello, World!").unwrap();

        let reopened = AuthenticatedCipher::new("s3cret", cipher.salt(), ROUNDS).unwrap();
        assert_eq!(reopened.decrypt(&sealed).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_ciphertext_survives_codec() {
        let cipher = AuthenticatedCipher::with_random_salt("pw", ROUNDS).unwrap();
        let sealed = cipher.encrypt("watermark 2024").unwrap();

        assert!(sealed.chars().all(codec::is_supported));
        let fragment = codec::encode_text(&sealed).unwrap();
        let decoded = codec::decode_fragment(&fragment).unwrap();
        assert_eq!(cipher.decrypt(&decoded).unwrap(), "watermark 2024");
    }

    #[test]
    fn test_wrong_password_fails() {
        let cipher = AuthenticatedCipher::with_random_salt("right", ROUNDS).unwrap();
        let sealed = cipher.encrypt("secret").unwrap();

        let wrong = AuthenticatedCipher::new("wrong", cipher.salt(), ROUNDS).unwrap();
        assert!(matches!(wrong.decrypt(&sealed), Err(WatermarkError::DecryptionFailed)));
    }

    #[test]
    fn test_wrong_salt_fails() {
        let cipher = AuthenticatedCipher::with_random_salt("right", ROUNDS).unwrap();
        let sealed = cipher.encrypt("secret").unwrap();

        let other = AuthenticatedCipher::new("right", Salt::legacy(), ROUNDS).unwrap();
        assert!(matches!(other.decrypt(&sealed), Err(WatermarkError::DecryptionFailed)));
    }

    #[test]
    fn test_garbage_fails_cleanly() {
        let cipher = AuthenticatedCipher::legacy("pw", ROUNDS).unwrap();
        for garbage in ["", "ABC", "!", "!1", "HELLO,WORLD", "....////"] {
            assert!(matches!(cipher.decrypt(garbage), Err(WatermarkError::DecryptionFailed)));
        }
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(
            AuthenticatedCipher::legacy("", ROUNDS),
            Err(WatermarkError::MissingPassword)
        ));
    }

    #[test]
    fn test_armor_roundtrip() {
        let encoded = "aZ-_09xy";
        let armored = armor(encoded);
        assert_eq!(armored, "!AZ./09!X!Y");
        assert_eq!(unarmor(&armored).unwrap(), encoded);
        assert_eq!(armor("QQ=="), "QQ");
    }

    #[test]
    fn test_salt_hex_roundtrip() {
        let salt = Salt::random();
        let text = salt.to_string();
        assert_eq!(text.len(), SALT_LEN * 2);
        assert_eq!(text.parse::<Salt>().unwrap(), salt);
        assert!(matches!("abcd".parse::<Salt>(), Err(WatermarkError::InvalidSalt(_))));
        assert!(matches!("zz".parse::<Salt>(), Err(WatermarkError::InvalidSalt(_))));
    }

    #[test]
    fn test_default_rounds_roundtrip() {
        let cipher = AuthenticatedCipher::with_random_salt("slow", DEFAULT_KDF_ROUNDS).unwrap();
        let sealed = cipher.encrypt("OK").unwrap();
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "OK");
    }
}
