//! CLI pour le filigranage de séquences ADN

use clap::{Parser, Subcommand};
use filigrane_core::{Algorithm, EncryptionScheme, PositionStrategy};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

mod commands;
mod display;
mod settings;

use commands::{decode, detect, encode, extract, insert, password};
use settings::Settings;

#[derive(Parser)]
#[command(name = "filigrane")]
#[command(about = "Insertion et extraction de filigranes dans des séquences ADN", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Niveau de verbosité
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Fichier de configuration (défaut: filigrane.toml s'il existe)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode un texte en triplets nucléotidiques
    Encode {
        /// Texte à encoder
        text: String,

        /// Affiche le détail caractère par caractère
        #[arg(short, long)]
        details: bool,
    },

    /// Décode un fragment nucléotidique en texte
    Decode {
        /// Fragment (longueur multiple de 3)
        sequence: String,
    },

    /// Insère un filigrane dans un enregistrement GenBank ou JSON
    Insert {
        /// Enregistrement d'entrée (.gb, .json)
        #[arg(short, long)]
        input: PathBuf,

        /// Enregistrement filigrané
        #[arg(short, long)]
        output: PathBuf,

        /// Texte du filigrane
        #[arg(short, long)]
        text: String,

        /// Algorithme (plaintext, encrypted)
        #[arg(short, long, default_value = "plaintext")]
        algorithm: Algorithm,

        /// Position (before-cds, after-cds)
        #[arg(short, long, default_value = "before-cds")]
        strategy: PositionStrategy,

        /// Région d'intérêt 1-based `début..fin` (défaut: première CDS)
        #[arg(short, long)]
        region: Option<String>,

        /// Mot de passe (généré si absent en mode chiffré)
        #[arg(short, long)]
        password: Option<String>,

        /// Convention de chiffrement (salted, noise-wrapped, substitution)
        #[arg(long)]
        scheme: Option<EncryptionScheme>,

        /// Index JSON où enregistrer le filigrane
        #[arg(long)]
        index: Option<PathBuf>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Extrait le filigrane d'un enregistrement
    Extract {
        /// Enregistrement filigrané (.gb, .json)
        #[arg(short, long)]
        input: PathBuf,

        /// Algorithme (lu dans l'enregistrement si absent)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// Mot de passe
        #[arg(short, long)]
        password: Option<String>,

        /// Sel hexadécimal (lu dans l'enregistrement si absent)
        #[arg(long)]
        salt: Option<String>,

        /// Convention de chiffrement (lue dans l'enregistrement si absente)
        #[arg(long)]
        scheme: Option<EncryptionScheme>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Recherche les filigranes connus dans une séquence
    Detect {
        /// Séquence à analyser
        #[arg(short, long, conflicts_with = "input")]
        sequence: Option<String>,

        /// Enregistrement ou fichier de séquence brute à analyser
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Index JSON des filigranes
        #[arg(long)]
        index: Option<PathBuf>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Génère un mot de passe
    Password {
        /// Longueur
        #[arg(short, long)]
        length: Option<usize>,

        /// Politique de composition
        #[arg(short, long, value_enum)]
        policy: Option<PolicyArg>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
pub enum PolicyArg {
    Basic,
    Strong,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    let level = match cli.verbose {
        0 => settings.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    filigrane_core::init_logging_with(level, &settings.logging.format);

    let result = match cli.command {
        Commands::Encode { text, details } => encode::run(&text, details),
        Commands::Decode { sequence } => decode::run(&sequence),
        Commands::Insert {
            input,
            output,
            text,
            algorithm,
            strategy,
            region,
            password,
            scheme,
            index,
            json,
        } => insert::run(
            &settings,
            insert::InsertArgs {
                input,
                output,
                text,
                algorithm,
                strategy,
                region,
                password,
                scheme,
                index,
                json,
            },
        ),
        Commands::Extract {
            input,
            algorithm,
            password,
            salt,
            scheme,
            json,
        } => extract::run(&settings, input, algorithm, password, salt, scheme, json),
        Commands::Detect {
            sequence,
            input,
            index,
            json,
        } => detect::run(&settings, sequence, input, index, json),
        Commands::Password { length, policy } => password::run(&settings, length, policy),
    };

    result.map_err(|e| filigrane_core::log_error!(e))
}

/// Crée une barre de progression spinner
pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
