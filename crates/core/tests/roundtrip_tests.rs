//! Propriétés d'aller-retour (proptest)

use filigrane_core::codec::{decode_fragment, encode_text, supported_alphabet};
use filigrane_core::{
    AnnotatedRecord, ExtractRequest, Feature, InsertRequest, Interval, PositionStrategy,
    WatermarkConfig, WatermarkExtractor, WatermarkInserter,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn payload() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(supported_alphabet().to_vec()), 1..40)
        .prop_map(|chars| chars.into_iter().collect())
}

fn host(len: usize) -> AnnotatedRecord {
    let sequence: String = "ACGT".chars().cycle().take(len).collect();
    let mut record = AnnotatedRecord::new("PROP", sequence);
    record.features.push(Feature::new("CDS", Interval::new(len / 4, len / 2).unwrap()));
    record.features.push(Feature::new("gene", Interval::new(len / 2, len).unwrap()));
    record
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_plaintext_roundtrip(text in payload()) {
        let fragment = encode_text(&text).unwrap();
        prop_assert_eq!(decode_fragment(&fragment).unwrap(), text);
    }

    #[test]
    fn prop_insert_then_extract(text in payload(), after in any::<bool>(), len in 40usize..400) {
        let config = WatermarkConfig::fast();
        let inserter = WatermarkInserter::new(config.clone());
        let extractor = WatermarkExtractor::new(config);
        let record = host(len);
        let region = record.features[0].interval;
        let strategy = if after { PositionStrategy::AfterRegion } else { PositionStrategy::BeforeRegion };

        let insertion = inserter
            .insert(&record, &InsertRequest::plaintext(text.clone(), strategy, region))
            .unwrap();
        prop_assert_eq!(insertion.record.len(), len + text.len() * 3);
        prop_assert_eq!(&record, &host(len));

        let info = extractor.extract(&insertion.record, &ExtractRequest::default()).unwrap();
        prop_assert_eq!(info.original_text, text);
        prop_assert_eq!(info.position, insertion.info.position);
    }

    #[test]
    fn prop_noise_wrapped_extracts(text in payload(), seed in any::<u64>()) {
        let config = WatermarkConfig::fast();
        let inserter = WatermarkInserter::new(config.clone());
        let extractor = WatermarkExtractor::new(config);
        let record = host(120);
        let region = record.features[0].interval;
        let request = InsertRequest::plaintext(text.clone(), PositionStrategy::BeforeRegion, region)
            .encrypted(Some("pw".into()))
            .with_scheme(filigrane_core::EncryptionScheme::NoiseWrapped);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let insertion = inserter.insert_with_rng(&record, &request, &mut rng).unwrap();
        let info = extractor
            .extract(&insertion.record, &ExtractRequest::with_password("pw"))
            .unwrap();
        prop_assert_eq!(info.original_text, text);
    }
}
