//! Codec texte <-> triplets nucléotidiques

pub mod table;
pub mod triplet;

pub use triplet::{
    all_valid_codons, codon_details, decode_codon, decode_fragment, encode_char, encode_text,
    is_supported, is_valid_codon, supported_alphabet, Codon,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn supported_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(supported_alphabet().to_vec()), 0..100)
            .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_codec_roundtrip(text in supported_text()) {
            let fragment = encode_text(&text).unwrap();
            prop_assert_eq!(fragment.len(), text.len() * 3);
            prop_assert_eq!(decode_fragment(&fragment).unwrap(), text);
        }

        #[test]
        fn prop_lowercase_roundtrips_to_uppercase(text in "[a-z0-9 ]{0,40}") {
            let fragment = encode_text(&text).unwrap();
            prop_assert_eq!(decode_fragment(&fragment).unwrap(), text.to_uppercase());
        }

        #[test]
        fn prop_invalid_length_rejected(fragment in "[ACGT]{1,90}") {
            prop_assume!(fragment.len() % 3 != 0);
            prop_assert!(matches!(
                decode_fragment(&fragment),
                Err(crate::WatermarkError::InvalidLength(_))
            ));
        }
    }
}
