//! Affichage console

pub mod info;
pub mod tables;

pub use info::display_info;
pub use tables::{display_codons, display_matches};
