use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use storefront_lib::{ContextOptions, Settings, settings_path};

use crate::CliError;

/// Show the settings file and the paths it resolves to.
pub(crate) fn run_config_show(
    settings: &Settings,
    options: &ContextOptions,
) -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "Storefront Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    log::info!(
        "  Database:      {}",
        settings.database_path(options.database.clone()).display(),
    );
    match settings.seed_file(options.seed_file.clone()) {
        Some(seed) => log::info!("  Seed file:     {}", seed.display()),
        None => log::info!("  Seed file:     (built-in catalog)"),
    }
    log::info!("  Preferences:   {}", settings.preferences_dir().display());
    log::info!("  Namespace:     {}", settings.preferences.namespace);
    crate::log_blank();

    let toml = settings
        .to_toml_string()
        .ok_or_else(|| CliError::config("settings could not be serialized"))?;
    for line in toml.lines() {
        log::info!("  {line}");
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    println!("{}", settings_path().display());
}
