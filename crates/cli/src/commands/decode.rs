//! Commande de décodage

use anyhow::Result;
use console::style;
use filigrane_core::codec;

pub fn run(sequence: &str) -> Result<()> {
    let fragment: String = sequence.chars().filter(|c| !c.is_whitespace()).collect();
    let text = codec::decode_fragment(&fragment)?;

    println!("🧬 {} bases -> {} caractères", fragment.len(), text.chars().count());
    println!("{}", style(text).cyan());

    Ok(())
}
