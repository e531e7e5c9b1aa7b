//! Affichage d'un filigrane inséré ou extrait

use console::style;
use filigrane_core::{format_sequence, gc_ratio, WatermarkInfo};

/// Affiche la description d'un filigrane
pub fn display_info(info: &WatermarkInfo) {
    println!();
    println!("  {:<12} {}", style("Position").bold(), info.position.one_based());
    println!("  {:<12} {} bp", style("Longueur").bold(), info.len());
    println!(
        "  {:<12} {:.1} %",
        style("GC").bold(),
        gc_ratio(&info.sequence) * 100.0
    );
    println!("  {:<12} {}", style("Algorithme").bold(), info.algorithm);
    if let Some(scheme) = info.scheme {
        if scheme.is_legacy() {
            println!("  {:<12} {} {}", style("Schéma").bold(), scheme, style("(historique)").dim());
        } else {
            println!("  {:<12} {}", style("Schéma").bold(), scheme);
        }
    }
    if let Some(rounds) = info.kdf_rounds {
        println!("  {:<12} {}", style("PBKDF2").bold(), rounds);
    }
    if let Some(salt) = info.salt {
        println!("  {:<12} {}", style("Sel").bold(), salt);
    }
    println!("  {:<12} {}", style("Texte").bold(), style(&info.original_text).cyan());
    if let Some(password) = info.password.as_deref() {
        println!(
            "  {:<12} {}  {}",
            style("Mot de passe").bold(),
            style(password).yellow(),
            style("(généré, à conserver)").dim()
        );
    }

    println!("  {}", style("Séquence").bold());
    for line in format_sequence(&info.sequence.to_lowercase()) {
        println!("  {}", line);
    }
}
