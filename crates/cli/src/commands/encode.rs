//! Commande d'encodage

use crate::display::display_codons;
use anyhow::Result;
use console::style;
use filigrane_core::codec;

pub fn run(text: &str, details: bool) -> Result<()> {
    let fragment = codec::encode_text(text)?;

    println!("🧬 {} caractères -> {} bases", text.chars().count(), fragment.len());
    println!("{}", style(&fragment).green());

    if details {
        display_codons(&codec::codon_details(text)?);
    }

    Ok(())
}
