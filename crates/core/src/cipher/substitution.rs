//! Chiffre par substitution (convention historique)
//!
//! Chaque caractère est un indice dans l'alphabet du codec (taille N). Le décalage
//! appliqué en position `i` est la somme des codes des caractères du mot de passe
//! jusqu'à `i mod len` inclus, modulo N.

use super::AlphabetCipher;
use crate::codec;
use crate::error::{Result, WatermarkError};

pub struct SubstitutionCipher {
    alphabet: &'static [char],
    offsets: Vec<usize>,
}

impl SubstitutionCipher {
    pub fn new(password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(WatermarkError::MissingPassword);
        }

        let alphabet = codec::supported_alphabet();
        let n = alphabet.len();
        let offsets = password
            .chars()
            .scan(0usize, |sum, c| {
                *sum = (*sum + c as usize) % n;
                Some(*sum)
            })
            .collect();

        Ok(Self { alphabet, offsets })
    }

    fn offset(&self, position: usize) -> usize {
        self.offsets[position % self.offsets.len()]
    }

    fn index_of(&self, c: char) -> Result<usize> {
        let upper = c.to_ascii_uppercase();
        self.alphabet
            .iter()
            .position(|&a| a == upper)
            .ok_or(WatermarkError::UnsupportedCharacter(c))
    }
}

impl AlphabetCipher for SubstitutionCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let n = self.alphabet.len();
        plaintext
            .chars()
            .enumerate()
            .map(|(i, c)| Ok(self.alphabet[(self.index_of(c)? + self.offset(i)) % n]))
            .collect()
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let n = self.alphabet.len();
        ciphertext
            .chars()
            .enumerate()
            .map(|(i, c)| Ok(self.alphabet[(self.index_of(c)? + n - self.offset(i)) % n]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_uppercases() {
        let cipher = SubstitutionCipher::new("key").unwrap();
        let sealed = cipher.encrypt("Hello World 42!").unwrap();
        assert_ne!(sealed, "HELLO WORLD 42!");
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "HELLO WORLD 42!");
    }

    #[test]
    fn test_offsets_are_cumulative() {
        // 'A' = 65, 65 % 49 = 16 ; 'A' + 'A' = 130, 130 % 49 = 32
        let cipher = SubstitutionCipher::new("AA").unwrap();
        assert_eq!(cipher.offsets, vec![16, 32]);
        let alphabet = codec::supported_alphabet();
        assert_eq!(cipher.encrypt("AAA").unwrap(), format!("{}{}{}", alphabet[16], alphabet[32], alphabet[16]));
    }

    #[test]
    fn test_output_stays_in_alphabet() {
        let cipher = SubstitutionCipher::new("pässwörd").unwrap();
        let sealed = cipher.encrypt("THE QUICK BROWN FOX").unwrap();
        assert!(sealed.chars().all(codec::is_supported));
    }

    #[test]
    fn test_unsupported_character() {
        let cipher = SubstitutionCipher::new("key").unwrap();
        assert!(matches!(
            cipher.encrypt("café"),
            Err(WatermarkError::UnsupportedCharacter('é'))
        ));
    }

    #[test]
    fn test_empty_password() {
        assert!(matches!(SubstitutionCipher::new(""), Err(WatermarkError::MissingPassword)));
    }
}
