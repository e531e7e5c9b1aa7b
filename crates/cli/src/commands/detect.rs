//! Commande de détection de contrefaçon

use crate::display::display_matches;
use crate::settings::Settings;
use anyhow::{bail, Context, Result};
use console::style;
use filigrane_core::sequence::is_nucleotide_sequence;
use filigrane_core::{RecordFormat, WatermarkIndex};
use std::path::{Path, PathBuf};

pub fn run(
    settings: &Settings,
    sequence: Option<String>,
    input: Option<PathBuf>,
    index: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let Some(index_path) = index.or_else(|| settings.index.clone()) else {
        bail!("Aucun index: préciser --index ou `index` dans la configuration");
    };
    let index = WatermarkIndex::load(&index_path)
        .with_context(|| format!("Index illisible: {}", index_path.display()))?;

    let target = match (sequence, input) {
        (Some(sequence), _) => sequence,
        (None, Some(path)) => read_target(&path)?,
        (None, None) => bail!("Préciser --sequence ou --input"),
    };

    let matches = index.find(&target)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("✅ Aucun filigrane connu parmi {} enregistrés", index.len());
        return Ok(());
    }

    println!(
        "{} {} filigrane(s) retrouvé(s) parmi {}",
        style("⚠").yellow(),
        matches.len(),
        index.len()
    );
    display_matches(&matches);

    Ok(())
}

/// Séquence d'un enregistrement, ou contenu brut d'un fichier de séquence
fn read_target(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Lecture impossible: {}", path.display()))?;
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    if is_nucleotide_sequence(&compact) {
        return Ok(compact);
    }
    Ok(RecordFormat::from_path(path).parse(&content)?.sequence)
}
