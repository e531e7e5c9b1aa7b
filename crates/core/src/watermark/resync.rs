//! Recherche de resynchronisation
//!
//! Quand les bornes exactes du texte chiffré sont inconnues (bruit autour du
//! fragment), chaque sous-intervalle aligné sur 3 est décodé puis déchiffré. Les
//! candidats sont ordonnés par début puis par fin; le premier succès l'emporte.
//! Pour un début donné les codons sont décodés incrémentalement et le parcours
//! s'arrête au premier codon inconnu, aucune fin plus lointaine ne pouvant alors
//! être décodée.

use crate::cipher::AlphabetCipher;
use crate::codec;
use crate::error::{Result, WatermarkError};
use crate::record::Interval;
use rayon::prelude::*;
use tracing::debug;

/// Retrouve l'intervalle (relatif au fragment) et le texte clair du filigrane
pub fn resynchronize<C>(fragment: &str, cipher: &C) -> Result<(Interval, String)>
where
    C: AlphabetCipher + Sync,
{
    let bases: Vec<char> = fragment.chars().collect();

    let found = (0..bases.len())
        .into_par_iter()
        .find_map_first(|start| scan_from(&bases, start, cipher));

    match found {
        Some((interval, text)) => {
            debug!(interval = %interval, "Resynchronisation réussie");
            Ok((interval, text))
        }
        None => Err(WatermarkError::WatermarkDecodeFailed),
    }
}

fn scan_from<C: AlphabetCipher>(bases: &[char], start: usize, cipher: &C) -> Option<(Interval, String)> {
    let mut decoded = String::new();
    let mut end = start;

    while end + 3 <= bases.len() {
        let codon: String = bases[end..end + 3].iter().collect();
        decoded.push(codec::decode_codon(&codon).ok()?);
        end += 3;

        if let Ok(text) = cipher.decrypt(&decoded) {
            return Some((Interval { start, end }, text));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{generate_noise_fragment_with, AuthenticatedCipher};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const ROUNDS: u32 = 16;

    #[test]
    fn test_finds_payload_inside_noise() {
        let cipher = AuthenticatedCipher::legacy("pw", ROUNDS).unwrap();
        let body = codec::encode_text(&cipher.encrypt("FOUND ME").unwrap()).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let prefix = generate_noise_fragment_with(&mut rng, 17);
        let suffix = generate_noise_fragment_with(&mut rng, 25);
        let fragment = format!("{}{}{}", prefix, body, suffix);

        let (interval, text) = resynchronize(&fragment, &cipher).unwrap();
        assert_eq!(text, "FOUND ME");
        assert_eq!(interval, Interval::new(17, 17 + body.len()).unwrap());
    }

    #[test]
    fn test_terminates_without_match() {
        let cipher = AuthenticatedCipher::legacy("pw", ROUNDS).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let fragment = generate_noise_fragment_with(&mut rng, 90);

        assert!(matches!(
            resynchronize(&fragment, &cipher),
            Err(WatermarkError::WatermarkDecodeFailed)
        ));
    }

    #[test]
    fn test_wrong_password_exhausts_search() {
        let cipher = AuthenticatedCipher::legacy("right", ROUNDS).unwrap();
        let body = codec::encode_text(&cipher.encrypt("HIDDEN").unwrap()).unwrap();
        let fragment = format!("ACGTACGTAC{}TTGCA", body);

        let wrong = AuthenticatedCipher::legacy("wrong", ROUNDS).unwrap();
        assert!(matches!(
            resynchronize(&fragment, &wrong),
            Err(WatermarkError::WatermarkDecodeFailed)
        ));
    }

    #[test]
    fn test_empty_and_short_fragments() {
        let cipher = AuthenticatedCipher::legacy("pw", ROUNDS).unwrap();
        assert!(resynchronize("", &cipher).is_err());
        assert!(resynchronize("AC", &cipher).is_err());
    }
}
