use anyhow::{Context, Result};
use clap::ArgMatches;
use console::style;
use mediashelf_config::ConfigManager;
use mediashelf_core::{Item, ItemFilter, ItemId, MediaType, NewItem};
use mediashelf_library::{ImportReport, LibraryManager, StaticCatalogFetcher};

#[cfg(test)]
mod tests;

/// Writes a default config file next to the freshly created database
pub fn init(manager: &LibraryManager, config_manager: &ConfigManager) -> Result<()> {
    let created = config_manager
        .initialize()
        .context("Failed to write config file")?;

    println!(
        "{} Database ready at {}",
        style("✓").green().bold(),
        manager.config().database_path
    );
    if created {
        println!("  Config written to {}", config_manager.config_path().display());
    } else {
        println!("  Using config at {}", config_manager.config_path().display());
    }

    Ok(())
}

/// Builds the list filter from `--media-type` / `--favorites`
pub fn filter_from(matches: &ArgMatches) -> ItemFilter {
    if let Some(media_type) = matches.get_one::<String>("media-type") {
        ItemFilter::MediaType(MediaType::from(media_type.as_str()))
    } else if matches.get_flag("favorites") {
        ItemFilter::Favorites
    } else {
        ItemFilter::All
    }
}

/// List catalog items
pub async fn list_items(manager: &LibraryManager, matches: &ArgMatches) -> Result<()> {
    let items = manager
        .list_items(&filter_from(matches))
        .await
        .context("Failed to list items")?;

    if items.is_empty() {
        println!("No items found. Use 'add' or 'import' to fill the catalog.");
        return Ok(());
    }

    println!("\n{} Items in Catalog", style(items.len()).bold().cyan());
    println!("{}", "=".repeat(80));

    for item in &items {
        print_item_summary(item);
    }

    Ok(())
}

/// Builds the creation payload from `add` arguments
pub fn new_item_from(matches: &ArgMatches) -> Result<NewItem> {
    let title = matches
        .get_one::<String>("title")
        .ok_or_else(|| anyhow::anyhow!("Title is required"))?;

    let mut fields = NewItem::new(title.trim()).with_favorite(matches.get_flag("favorite"));

    if let Some(description) = matches.get_one::<String>("description") {
        fields = fields.with_description(description.trim());
    }
    if let Some(media_type) = matches.get_one::<String>("media-type") {
        fields = fields.with_media_type(MediaType::from(media_type.trim()));
    }
    if let Some(url) = matches.get_one::<String>("url") {
        fields = fields.with_url(url.trim());
    }

    Ok(fields)
}

/// Add an item to the catalog
pub async fn add_item(manager: &LibraryManager, matches: &ArgMatches) -> Result<()> {
    let item = manager
        .add_item(new_item_from(matches)?)
        .await
        .context("Failed to add item")?;

    println!("{} Item added successfully!", style("✓").green().bold());
    println!("  ID: {}", item.id);
    println!("  Title: {}", item.display_title());
    if let Some(media_type) = &item.media_type {
        println!("  Type: {}", media_type);
    }

    Ok(())
}

/// Show detailed information about an item
pub async fn show_item_info(manager: &LibraryManager, matches: &ArgMatches) -> Result<()> {
    let item_id = parse_item_id(matches)?;
    let item = manager
        .get_item(item_id)
        .await
        .context("Failed to get item")?;

    println!("\n{}", style("Item Information").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("ID: {}", item.id);
    println!("Title: {}", style(item.display_title()).bold());

    match &item.media_type {
        Some(media_type) => println!("Type: {}", media_type),
        None => println!("Type: -"),
    }
    if let Some(description) = &item.description_text {
        let label = if item.is_book() { "Author" } else { "Description" };
        println!("{}: {}", label, description);
    }
    if let Some(url) = &item.url {
        println!("URL: {}", url);
    }

    println!("\nFlags:");
    println!("  Favorite: {}", yes_no(item.favorite));
    println!("  From Books app: {}", yes_no(item.is_in_app));
    println!("  On Mac: {}", yes_no(item.is_on_mac));
    println!("  On iPhone: {}", yes_no(item.is_on_iphone));
    println!("  Downloading: {}", yes_no(item.is_downloading));
    println!("\nAdded: {}", item.timestamp);

    Ok(())
}

/// Delete an item from the catalog
pub async fn delete_item(manager: &LibraryManager, matches: &ArgMatches) -> Result<()> {
    let item_id = parse_item_id(matches)?;
    let item = manager
        .get_item(item_id)
        .await
        .context("Failed to get item")?;

    if !matches.get_flag("force") {
        println!(
            "Are you sure you want to delete '{}'? (y/N)",
            item.display_title()
        );
        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    manager
        .delete_item(item_id)
        .await
        .context("Failed to delete item")?;

    println!(
        "{} Item deleted: {}",
        style("✓").green().bold(),
        item.display_title()
    );

    Ok(())
}

/// Toggle favorite status of an item
pub async fn toggle_favorite(manager: &LibraryManager, matches: &ArgMatches) -> Result<()> {
    let item_id = parse_item_id(matches)?;
    let favorite = !matches.get_flag("remove");

    let item = manager
        .set_favorite(item_id, favorite)
        .await
        .context("Failed to update item")?;

    if favorite {
        println!(
            "{} Added '{}' to favorites",
            style("✓").green().bold(),
            item.display_title()
        );
    } else {
        println!(
            "{} Removed '{}' from favorites",
            style("✓").green().bold(),
            item.display_title()
        );
    }

    Ok(())
}

/// Show catalog statistics
pub async fn show_stats(manager: &LibraryManager) -> Result<()> {
    let stats = manager
        .get_stats()
        .await
        .context("Failed to compute statistics")?;

    println!("\n{}", style("Catalog Statistics").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("Total Items: {}", style(stats.total_items).bold());
    println!(
        "Favorites: {} ({:.1}%)",
        style(stats.favorite_count).bold(),
        stats.favorite_percentage()
    );
    println!("From Books app: {}", stats.in_app_count);

    if !stats.by_media_type.is_empty() || stats.untyped_count > 0 {
        println!("\nBy Type:");
        for (media_type, count) in &stats.by_media_type {
            println!("  {:<12} {}", media_type, count);
        }
        if stats.untyped_count > 0 {
            println!("  {:<12} {}", "(none)", stats.untyped_count);
        }
    }

    Ok(())
}

/// Import books from the external catalog or a saved capture
pub async fn import_books(manager: &LibraryManager, matches: &ArgMatches) -> Result<()> {
    let options = manager.import_options(matches.get_flag("dry-run"));

    let report = match matches.get_one::<String>("from-file") {
        Some(path) => {
            let fetcher = StaticCatalogFetcher::from_file(path)
                .await
                .with_context(|| format!("Failed to read {}", path))?;
            manager.import_from_catalog(&fetcher, &options).await
        }
        None => {
            println!("Reading the Books library...");
            let fetcher = manager.catalog_fetcher();
            manager.import_from_catalog(&fetcher, &options).await
        }
    }
    .context("Import failed")?;

    print_import_report(&report);
    Ok(())
}

fn print_import_report(report: &ImportReport) {
    if report.fetched == 0 {
        println!(
            "No books were read from {}. Check that the application is available.",
            report.source
        );
        return;
    }

    let verb = if report.dry_run { "Would import" } else { "Imported" };
    println!(
        "{} {} {} new book(s)",
        style("✓").green().bold(),
        verb,
        style(report.created_count()).bold()
    );
    println!(
        "  {} read, {} already in catalog, {} repeated",
        report.fetched, report.skipped_existing, report.skipped_duplicates
    );

    for item in &report.created {
        print_item_summary(item);
    }
}

fn parse_item_id(matches: &ArgMatches) -> Result<ItemId> {
    let id_str = matches
        .get_one::<String>("id")
        .ok_or_else(|| anyhow::anyhow!("Item ID is required"))?;

    ItemId::from_string(id_str).context("Invalid item ID format")
}

fn print_item_summary(item: &Item) {
    println!("\n{}", style(item.display_title()).bold());
    if let Some(description) = &item.description_text {
        if !description.is_empty() {
            let prefix = if item.is_book() { "by " } else { "" };
            println!("  {}{}", prefix, truncate(description, 70));
        }
    }

    let media_type = item
        .media_type
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string());
    print!(
        "  ID: {} | Type: {}",
        truncate(&item.id.to_string(), 8),
        media_type
    );
    if item.favorite {
        print!("  {}", style("★ Favorite").yellow());
    }
    println!();
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}
