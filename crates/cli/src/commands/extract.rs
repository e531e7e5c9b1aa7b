//! Commande d'extraction

use super::read_record;
use crate::create_spinner;
use crate::display::display_info;
use crate::settings::Settings;
use anyhow::Result;
use filigrane_core::{Algorithm, EncryptionScheme, ExtractRequest, Salt, WatermarkExtractor};
use std::path::PathBuf;

pub fn run(
    settings: &Settings,
    input: PathBuf,
    algorithm: Option<Algorithm>,
    password: Option<String>,
    salt: Option<String>,
    scheme: Option<EncryptionScheme>,
    json: bool,
) -> Result<()> {
    let record = read_record(&input)?;
    let request = ExtractRequest {
        algorithm,
        password,
        salt: salt.as_deref().map(str::parse::<Salt>).transpose()?,
        scheme,
    };

    let spinner = create_spinner("Extraction du filigrane...");
    let extractor = WatermarkExtractor::new(settings.watermark.clone());
    let info = extractor.extract(&record, &request);
    spinner.finish_and_clear();
    let info = info?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("🧬 Filigrane extrait de {}", input.display());
    display_info(&info);
    println!("\n✅ Extraction terminée!");

    Ok(())
}
