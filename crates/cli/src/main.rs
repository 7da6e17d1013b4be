use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use mediashelf_config::{Config, ConfigManager};
use mediashelf_library::{LibraryConfig, LibraryManager};
use std::path::PathBuf;

mod commands;

fn build_cli() -> Command {
    Command::new("mediashelf")
        .version(env!("CARGO_PKG_VERSION"))
        .author("MediaShelf Contributors")
        .about("Personal media catalog with Books import")
        .arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("PATH")
                .help("Path to the database file (overrides the config file)")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to the config file")
                .global(true),
        )
        .subcommand(
            Command::new("init").about("Create the database and a default config file"),
        )
        .subcommand(
            Command::new("list")
                .about("List catalog items")
                .arg(
                    Arg::new("media-type")
                        .short('m')
                        .long("media-type")
                        .value_name("TYPE")
                        .help("Show only items of this media type (e.g. Book, Movie)")
                        .conflicts_with("favorites"),
                )
                .arg(
                    Arg::new("favorites")
                        .short('f')
                        .long("favorites")
                        .help("Show only favorite items")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add an item to the catalog")
                .arg(Arg::new("title").required(true).value_name("TITLE").help("Item title"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .value_name("TEXT")
                        .help("Description (the author, for books)"),
                )
                .arg(
                    Arg::new("media-type")
                        .short('m')
                        .long("media-type")
                        .value_name("TYPE")
                        .help("Media type (Book, Movie, Song, Podcast, Document, Other)"),
                )
                .arg(Arg::new("url").long("url").value_name("URL").help("Link to the item"))
                .arg(
                    Arg::new("favorite")
                        .short('f')
                        .long("favorite")
                        .help("Mark as favorite")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Show detailed information about an item")
                .arg(Arg::new("id").required(true).value_name("ITEM_ID").help("Item ID (UUID)")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an item from the catalog")
                .arg(Arg::new("id").required(true).value_name("ITEM_ID").help("Item ID (UUID)"))
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Skip confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("favorite")
                .about("Mark an item as favorite or remove it from favorites")
                .arg(Arg::new("id").required(true).value_name("ITEM_ID").help("Item ID (UUID)"))
                .arg(
                    Arg::new("remove")
                        .short('r')
                        .long("remove")
                        .help("Remove from favorites")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("stats").about("Show catalog statistics"))
        .subcommand(
            Command::new("import")
                .about("Import books from the Books application")
                .arg(
                    Arg::new("dry-run")
                        .short('n')
                        .long("dry-run")
                        .help("Show what would be imported without saving")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("from-file")
                        .long("from-file")
                        .value_name("FILE")
                        .help("Read previously captured script output instead of running it"),
                ),
        )
}

fn config_manager(path: Option<&String>) -> Result<ConfigManager> {
    let manager = match path {
        Some(path) => ConfigManager::with_file(PathBuf::from(path)),
        None => ConfigManager::new(),
    };
    manager.context("Failed to locate config file")
}

/// Loads the config file with environment overrides, falling back to defaults
fn load_config(manager: &ConfigManager) -> Config {
    match manager.load_with_env_overrides() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}; using default configuration", e);
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let config_manager = config_manager(matches.get_one::<String>("config"))?;
    let config = load_config(&config_manager);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();
    log::debug!("Config file: {}", config_manager.config_path().display());

    let mut library_config = LibraryConfig::from_config(&config);
    if let Some(db_path) = matches.get_one::<String>("database") {
        library_config.database_path = db_path.clone();
    }

    let manager = LibraryManager::new(library_config)
        .await
        .context("Failed to initialize database")?;

    match matches.subcommand() {
        Some(("init", _)) => commands::init(&manager, &config_manager),
        Some(("list", sub_matches)) => commands::list_items(&manager, sub_matches).await,
        Some(("add", sub_matches)) => commands::add_item(&manager, sub_matches).await,
        Some(("info", sub_matches)) => commands::show_item_info(&manager, sub_matches).await,
        Some(("delete", sub_matches)) => commands::delete_item(&manager, sub_matches).await,
        Some(("favorite", sub_matches)) => commands::toggle_favorite(&manager, sub_matches).await,
        Some(("stats", _)) => commands::show_stats(&manager).await,
        Some(("import", sub_matches)) => commands::import_books(&manager, sub_matches).await,
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
