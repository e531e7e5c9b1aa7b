//! Enveloppe JSON (sérialisation serde de l'enregistrement)

use super::Envelope;
use crate::error::{EnvelopeError, Result};
use crate::record::AnnotatedRecord;
use crate::sequence::normalize_sequence;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEnvelope;

impl Envelope for JsonEnvelope {
    fn parse(&self, input: &str) -> Result<AnnotatedRecord> {
        let mut record: AnnotatedRecord =
            serde_json::from_str(input).map_err(EnvelopeError::from)?;
        record.sequence = normalize_sequence(&record.sequence)?;
        Ok(record)
    }

    fn render(&self, record: &AnnotatedRecord) -> Result<String> {
        Ok(serde_json::to_string_pretty(record).map_err(EnvelopeError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatermarkError;
    use crate::record::{Feature, Interval};

    #[test]
    fn test_json_roundtrip() {
        let mut record = AnnotatedRecord::new("PJSON", "ACGTACGTAC");
        record.features.push(
            Feature::new("CDS", Interval::new(2, 8).unwrap()).with_qualifier("gene", "lacZ"),
        );
        record.comment = Some("Line one\nLine two".into());

        let text = JsonEnvelope.render(&record).unwrap();
        assert_eq!(JsonEnvelope.parse(&text).unwrap(), record);
    }

    #[test]
    fn test_json_sequence_is_normalized() {
        let record = JsonEnvelope
            .parse(r#"{"name": "X", "sequence": "acg t\n1 ac"}"#)
            .unwrap();
        assert_eq!(record.sequence, "ACGTAC");
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            JsonEnvelope.parse("{not json"),
            Err(WatermarkError::Envelope(EnvelopeError::Json(_)))
        ));
        assert!(matches!(
            JsonEnvelope.parse(r#"{"name": "X", "sequence": "ACGU"}"#),
            Err(WatermarkError::InvalidBase('U'))
        ));
    }
}
