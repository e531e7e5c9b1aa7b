//! Aléa: bruit nucléotidique et génération de mots de passe

use crate::codec;
use crate::sequence::Nucleotide;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

/// Longueur minimale d'un mot de passe généré
pub const MIN_PASSWORD_LEN: usize = 3;

/// Exigences de composition d'un mot de passe généré
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordPolicy {
    /// Au moins une lettre et un chiffre
    Basic,
    /// Au moins une lettre, un chiffre et une ponctuation
    #[default]
    Strong,
}

impl PasswordPolicy {
    fn required_classes(&self) -> usize {
        match self {
            PasswordPolicy::Basic => 2,
            PasswordPolicy::Strong => 3,
        }
    }
}

/// Fragment de bases uniformément aléatoires (usage cosmétique)
pub fn generate_noise_fragment(length: usize) -> String {
    generate_noise_fragment_with(&mut rand::thread_rng(), length)
}

pub fn generate_noise_fragment_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length).map(|_| Nucleotide::random(rng).as_char()).collect()
}

/// Longueur de bruit tirée dans `[min, max]`
pub fn random_noise_length<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Génère un mot de passe depuis l'alphabet du codec (espace exclu).
///
/// La longueur est relevée à `MIN_PASSWORD_LEN` et au nombre de classes exigées.
pub fn generate_password(length: usize, policy: PasswordPolicy) -> String {
    generate_password_with(&mut OsRng, length, policy)
}

pub fn generate_password_with<R: Rng + CryptoRng + ?Sized>(
    rng: &mut R,
    length: usize,
    policy: PasswordPolicy,
) -> String {
    let alphabet = codec::supported_alphabet();
    let letters: Vec<char> = alphabet.iter().copied().filter(char::is_ascii_alphabetic).collect();
    let digits: Vec<char> = alphabet.iter().copied().filter(char::is_ascii_digit).collect();
    let punctuation: Vec<char> = alphabet
        .iter()
        .copied()
        .filter(|c| c.is_ascii_punctuation())
        .collect();
    let pool: Vec<char> = alphabet.iter().copied().filter(|c| *c != ' ').collect();

    let length = length.max(MIN_PASSWORD_LEN).max(policy.required_classes());
    let mut chars: Vec<char> = Vec::with_capacity(length);

    chars.extend(letters.choose(rng));
    chars.extend(digits.choose(rng));
    if policy == PasswordPolicy::Strong {
        chars.extend(punctuation.choose(rng));
    }
    while chars.len() < length {
        chars.extend(pool.choose(rng));
    }

    chars.shuffle(rng);
    chars.into_iter().collect()
}
