//! storefront CLI
//!
//! Command-line front end for the graphics card catalog: queries, saved
//! views, and the shopping cart.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use storefront_lib::{ContextOptions, Settings, StorefrontContext};

use cli_types::{CartAction, Cli, Commands, ConfigAction, PrefsAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!(
            "{} {}",
            "Error:".if_supports_color(Stderr, |t| t.red()),
            e.if_supports_color(Stderr, |t| t.red()),
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load();
    let options = ContextOptions {
        database: cli.db,
        seed_file: cli.seed,
    };

    match cli.command {
        // Settings commands never touch the catalog.
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&settings, &options),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
        command => {
            let ctx = StorefrontContext::open(&settings, options)?;
            run_catalog_command(&ctx, command)
        }
    }
}

fn run_catalog_command(ctx: &StorefrontContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Init => commands::init::run_init(ctx),
        Commands::List => commands::list::run_list(ctx),
        Commands::Query(args) => commands::query::run_query(ctx, args),
        Commands::Values { field } => commands::field::run_values(ctx, field),
        Commands::Bounds { field } => commands::field::run_bounds(ctx, field),
        Commands::Schema => commands::schema::run_schema(ctx),
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::run_cart_show(ctx),
            CartAction::Add { name } => commands::cart::run_cart_add(ctx, &name),
            CartAction::Remove { name } => commands::cart::run_cart_remove(ctx, &name),
            CartAction::Clear => commands::cart::run_cart_clear(ctx),
        },
        Commands::Prefs { action } => match action {
            PrefsAction::Show => commands::prefs::run_prefs_show(ctx),
            PrefsAction::Reset => commands::prefs::run_prefs_reset(ctx),
        },
        Commands::Config { .. } => Ok(()),
    }
}

/// Route `log` output to stdout. Normal runs print bare messages, verbose
/// runs add timestamps and levels. `RUST_LOG` overrides the level.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        log::LevelFilter::Warn
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout);

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Error | log::Level::Warn => {
                writeln!(buf, "{}: {}", record.level(), record.args())
            }
            _ => writeln!(buf, "{}", record.args()),
        });
    }
    builder.init();
}

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
