//! Commande d'insertion

use super::{read_record, write_record};
use crate::create_spinner;
use crate::display::display_info;
use crate::settings::Settings;
use anyhow::{anyhow, Result};
use filigrane_core::{
    Algorithm, AnnotatedRecord, EncryptionScheme, InsertRequest, Interval, PositionStrategy,
    WatermarkIndex, WatermarkInserter,
};
use std::path::PathBuf;

pub struct InsertArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub text: String,
    pub algorithm: Algorithm,
    pub strategy: PositionStrategy,
    pub region: Option<String>,
    pub password: Option<String>,
    pub scheme: Option<EncryptionScheme>,
    pub index: Option<PathBuf>,
    pub json: bool,
}

pub fn run(settings: &Settings, args: InsertArgs) -> Result<()> {
    let record = read_record(&args.input)?;
    let region = match args.region.as_deref() {
        Some(region) => parse_region(region)?,
        None => default_region(&record)?,
    };

    let request = InsertRequest {
        text: args.text,
        algorithm: args.algorithm,
        strategy: args.strategy,
        region: Some(region),
        password: args.password,
        scheme: args.scheme,
    };

    let spinner = create_spinner("Insertion du filigrane...");
    let inserter = WatermarkInserter::new(settings.watermark.clone());
    let insertion = inserter.insert(&record, &request);
    spinner.finish_and_clear();
    let insertion = insertion?;

    write_record(&args.output, &insertion.record)?;

    let index_path = args.index.or_else(|| settings.index.clone());
    let registered = match index_path {
        Some(path) => {
            let mut index = WatermarkIndex::load_or_default(&path)?;
            let id = index.register(&insertion.info, &insertion.record);
            index.save(&path)?;
            Some(id)
        }
        None => None,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&insertion.info)?);
        return Ok(());
    }

    println!("🧬 Filigrane inséré dans {}", args.output.display());
    display_info(&insertion.info);
    if let Some(id) = registered {
        println!("\n  Enregistré dans l'index: {}", id);
    }
    println!("\n✅ Insertion terminée!");

    Ok(())
}

/// Lit une région 1-based `début..fin`
fn parse_region(region: &str) -> Result<Interval> {
    let (start, end) = region
        .split_once("..")
        .ok_or_else(|| anyhow!("Région invalide: {} (attendu début..fin)", region))?;
    let start: usize = start.trim().parse()?;
    let end: usize = end.trim().parse()?;
    Ok(Interval::from_one_based(start, end)?)
}

/// Première CDS de l'enregistrement
fn default_region(record: &AnnotatedRecord) -> Result<Interval> {
    record
        .find_feature("CDS")
        .map(|feature| feature.interval)
        .ok_or_else(|| anyhow!("Aucune CDS dans l'enregistrement, préciser --region"))
}
