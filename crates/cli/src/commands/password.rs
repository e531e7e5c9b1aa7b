//! Génération de mot de passe

use crate::settings::Settings;
use crate::PolicyArg;
use anyhow::Result;
use filigrane_core::cipher::generate_password;
use filigrane_core::PasswordPolicy;

pub fn run(settings: &Settings, length: Option<usize>, policy: Option<PolicyArg>) -> Result<()> {
    let policy = match policy {
        Some(PolicyArg::Basic) => PasswordPolicy::Basic,
        Some(PolicyArg::Strong) => PasswordPolicy::Strong,
        None => settings.watermark.password_policy,
    };
    let length = length.unwrap_or(settings.watermark.password_length);

    println!("{}", generate_password(length, policy));
    Ok(())
}
