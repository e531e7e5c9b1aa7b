//! Enveloppe GenBank (flat file), lue et écrite par `gb_io`
//!
//! `gb_io::seq::Seq` est converti en `AnnotatedRecord` et inversement. Seules les
//! localisations simples sont converties (`a..b`, `a`, `complement(a..b)`); une
//! localisation composée est refusée à la conversion.

use super::Envelope;
use crate::error::{EnvelopeError, Result};
use crate::record::{AnnotatedRecord, Feature, Interval, Qualifiers, RecordHeader, Reference, Strand};
use crate::sequence::normalize_sequence;
use gb_io::reader::SeqReader;
use gb_io::seq::{Date, Location, Seq, Source, Topology};
use std::borrow::Cow;
use gb_io::writer::SeqWriter;
use tracing::debug;

/// Qualificatif dont les blancs sont retirés à la lecture
const TRANSLATION: &str = "translation";
const DEFAULT_MOLECULE: &str = "DNA";
const DEFAULT_DIVISION: &str = "SYN";
const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GenBankEnvelope;

impl Envelope for GenBankEnvelope {
    fn parse(&self, input: &str) -> Result<AnnotatedRecord> {
        let seq = SeqReader::new(input.as_bytes())
            .next()
            .ok_or(EnvelopeError::MissingSection("LOCUS"))?
            .map_err(|e| EnvelopeError::Parse(e.to_string()))?;
        record_from_seq(seq)
    }

    fn render(&self, record: &AnnotatedRecord) -> Result<String> {
        let seq = seq_from_record(record)?;
        let mut buffer = Vec::new();
        SeqWriter::new(&mut buffer).write(&seq)?;
        String::from_utf8(buffer).map_err(|e| EnvelopeError::Render(e.to_string()).into())
    }
}

fn record_from_seq(seq: Seq) -> Result<AnnotatedRecord> {
    if seq.seq.is_empty() {
        return Err(EnvelopeError::MissingSection("ORIGIN").into());
    }
    let sequence = normalize_sequence(&String::from_utf8_lossy(&seq.seq))?;

    let features = seq
        .features
        .iter()
        .map(feature_from_gb)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let (source, organism) = match seq.source {
        Some(Source { source, organism }) => (Some(source), organism),
        None => (None, None),
    };

    let header = RecordHeader {
        molecule_type: seq.molecule_type,
        circular: matches!(seq.topology, Topology::Circular),
        division: Some(seq.division).filter(|division| !division.trim().is_empty()),
        date: seq.date.as_ref().map(format_date),
        accession: seq.accession,
        version: seq.version,
        keywords: seq.keywords,
        source,
        organism,
        references: seq.references.into_iter().map(reference_from_gb).collect(),
    };

    let record = AnnotatedRecord {
        name: seq.name.unwrap_or_default(),
        definition: seq.definition,
        sequence,
        features,
        comment: (!seq.comments.is_empty()).then(|| seq.comments.join("\n")),
        header,
    };
    debug!(
        name = %record.name,
        len = record.len(),
        features = record.features.len(),
        "Enregistrement GenBank lu"
    );
    Ok(record)
}

fn seq_from_record(record: &AnnotatedRecord) -> Result<Seq> {
    if record.name.split_whitespace().count() != 1 {
        return Err(EnvelopeError::Render(format!("nom de locus invalide: {:?}", record.name)).into());
    }
    let header = &record.header;

    let mut seq = Seq::empty();
    seq.name = Some(record.name.clone());
    seq.topology = if header.circular {
        Topology::Circular
    } else {
        Topology::Linear
    };
    seq.date = header.date.as_deref().map(parse_date).transpose()?;
    seq.len = Some(record.len());
    seq.molecule_type = Some(
        header
            .molecule_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MOLECULE.to_string()),
    );
    seq.division = header
        .division
        .clone()
        .unwrap_or_else(|| DEFAULT_DIVISION.to_string());
    seq.definition = record.definition.clone();
    seq.accession = header.accession.clone();
    seq.version = header.version.clone();
    seq.keywords = header.keywords.clone();
    seq.source = match (&header.source, &header.organism) {
        (None, None) => None,
        (source, organism) => Some(Source {
            source: source.clone().or_else(|| organism.clone()).unwrap_or_default(),
            organism: organism.clone(),
        }),
    };
    seq.references = header.references.iter().map(reference_to_gb).collect();
    // Une entrée par ligne: l'indentation des blocs de commentaire est conservée
    seq.comments = record
        .comment
        .as_deref()
        .map(|comment| comment.lines().map(str::to_string).collect())
        .unwrap_or_default();
    seq.seq = record.sequence.to_lowercase().into_bytes();
    seq.features = record
        .features
        .iter()
        .map(feature_to_gb)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(seq)
}

fn feature_from_gb(feature: &gb_io::seq::Feature) -> std::result::Result<Feature, EnvelopeError> {
    let (interval, strand) = interval_from_location(&feature.location)?;

    let mut qualifiers = Qualifiers::new();
    for (key, value) in &feature.qualifiers {
        let key = key.to_string();
        let value = match value {
            // Les lignes de suite d'une traduction sont recollées sans séparateur
            Some(value) if key == TRANSLATION => value.split_whitespace().collect::<String>(),
            Some(value) => value.split_whitespace().collect::<Vec<_>>().join(" "),
            None => String::new(),
        };
        qualifiers.push(key, value);
    }

    Ok(Feature {
        kind: feature.kind.to_string(),
        interval,
        strand,
        qualifiers,
    })
}

fn feature_to_gb(feature: &Feature) -> std::result::Result<gb_io::seq::Feature, EnvelopeError> {
    if feature.kind.is_empty() || feature.kind.contains(char::is_whitespace) {
        return Err(EnvelopeError::Render(format!("type invalide: {:?}", feature.kind)));
    }
    if feature.interval.is_empty() {
        return Err(EnvelopeError::Render(format!(
            "intervalle vide pour {}: {}",
            feature.kind, feature.interval
        )));
    }

    let mut qualifiers = Vec::new();
    for (key, values) in feature.qualifiers.iter() {
        for value in values {
            let value = (!value.is_empty()).then(|| value.clone());
            qualifiers.push((Cow::from(key.to_string()), value));
        }
    }

    Ok(gb_io::seq::Feature {
        kind: Cow::from(feature.kind.clone()),
        location: location_from_interval(feature.interval, feature.strand),
        qualifiers,
    })
}

/// Intervalle et brin d'une localisation simple
pub fn interval_from_location(
    location: &Location,
) -> std::result::Result<(Interval, Option<Strand>), EnvelopeError> {
    match location {
        Location::Range((start, _), (end, _)) => Ok((simple_interval(*start, *end, location)?, None)),
        Location::Complement(inner) => match inner.as_ref() {
            Location::Range((start, _), (end, _)) => {
                Ok((simple_interval(*start, *end, location)?, Some(Strand::Reverse)))
            }
            _ => Err(unsupported(location)),
        },
        _ => Err(unsupported(location)),
    }
}

/// Localisation GenBank d'un intervalle; le brin direct n'est pas écrit
pub fn location_from_interval(interval: Interval, strand: Option<Strand>) -> Location {
    let range = Location::simple_range(interval.start as i64, interval.end as i64);
    match strand {
        Some(Strand::Reverse) => Location::Complement(Box::new(range)),
        _ => range,
    }
}

fn simple_interval(start: i64, end: i64, location: &Location) -> std::result::Result<Interval, EnvelopeError> {
    match (usize::try_from(start), usize::try_from(end)) {
        (Ok(start), Ok(end)) if start < end => Ok(Interval { start, end }),
        _ => Err(unsupported(location)),
    }
}

fn unsupported(location: &Location) -> EnvelopeError {
    EnvelopeError::UnsupportedLocation(format!("{:?}", location))
}

fn reference_from_gb(reference: gb_io::seq::Reference) -> Reference {
    Reference {
        description: reference.description,
        authors: reference.authors,
        consortium: reference.consortium,
        title: reference.title,
        journal: reference.journal,
        pubmed: reference.pubmed,
        remark: reference.remark,
    }
}

fn reference_to_gb(reference: &Reference) -> gb_io::seq::Reference {
    gb_io::seq::Reference {
        description: reference.description.clone(),
        authors: reference.authors.clone(),
        consortium: reference.consortium.clone(),
        title: reference.title.clone(),
        journal: reference.journal.clone(),
        pubmed: reference.pubmed.clone(),
        remark: reference.remark.clone(),
    }
}

/// Date LOCUS au format `JJ-MMM-AAAA`
fn format_date(date: &Date) -> String {
    let month = (date.month() as usize)
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i))
        .copied()
        .unwrap_or("JAN");
    format!("{:02}-{}-{:04}", date.day(), month, date.year())
}

fn parse_date(text: &str) -> std::result::Result<Date, EnvelopeError> {
    let invalid = || EnvelopeError::Render(format!("date LOCUS invalide: {:?}", text));

    let mut parts = text.trim().split('-');
    let (Some(day), Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let day: u32 = day.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month))
        .ok_or_else(invalid)? as u32
        + 1;

    Date::from_ymd(year, month, day).map_err(|_| invalid())
}
