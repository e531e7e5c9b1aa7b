//! Tableaux (codons, correspondances)

use filigrane_core::{Codon, InfringementMatch};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CodonRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Char")]
    character: String,
    #[tabled(rename = "Codon")]
    codon: String,
}

/// Affiche la correspondance caractère -> codon
pub fn display_codons(details: &[(char, Codon)]) {
    let rows: Vec<CodonRow> = details
        .iter()
        .enumerate()
        .map(|(i, (c, codon))| CodonRow {
            index: i + 1,
            character: if *c == ' ' { "␣".to_string() } else { c.to_string() },
            codon: codon.to_string(),
        })
        .collect();

    println!();
    println!("{}", Table::new(rows));
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Algorithm")]
    algorithm: String,
    #[tabled(rename = "Accession")]
    accession: String,
    #[tabled(rename = "Organism")]
    organism: String,
    #[tabled(rename = "Length")]
    length: usize,
    #[tabled(rename = "Match")]
    matched: String,
}

/// Affiche les filigranes retrouvés dans une séquence
pub fn display_matches(matches: &[InfringementMatch<'_>]) {
    let rows: Vec<MatchRow> = matches
        .iter()
        .map(|m| MatchRow {
            id: m.entry.id.to_string().chars().take(8).collect(),
            created_at: m.entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            algorithm: m.entry.info.algorithm.to_string(),
            accession: m.entry.accession.clone().unwrap_or_else(|| "-".to_string()),
            organism: m.entry.organism.clone().unwrap_or_else(|| "-".to_string()),
            length: m.entry.info.len(),
            matched: m.matched.one_based().to_string(),
        })
        .collect();

    println!();
    println!("{}", Table::new(rows));
}
