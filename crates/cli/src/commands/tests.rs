use super::*;
use crate::build_cli;
use mediashelf_library::LibraryConfig;
use std::io::Write;
use tempfile::NamedTempFile;

async fn setup_test_manager() -> (LibraryManager, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap();

    let manager = LibraryManager::new(LibraryConfig::new(db_path))
        .await
        .unwrap();

    (manager, temp_file)
}

fn sub_matches(args: &[&str]) -> ArgMatches {
    let matches = build_cli()
        .try_get_matches_from(std::iter::once("mediashelf").chain(args.iter().copied()))
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    sub.clone()
}

#[test]
fn test_cli_definition_is_valid() {
    build_cli().debug_assert();
}

#[test]
fn test_filter_from_args() {
    assert_eq!(filter_from(&sub_matches(&["list"])), ItemFilter::All);
    assert_eq!(
        filter_from(&sub_matches(&["list", "--favorites"])),
        ItemFilter::Favorites
    );
    assert_eq!(
        filter_from(&sub_matches(&["list", "--media-type", "Movie"])),
        ItemFilter::MediaType(MediaType::Movie)
    );
}

#[test]
fn test_media_type_and_favorites_conflict() {
    let result = build_cli().try_get_matches_from([
        "mediashelf",
        "list",
        "--media-type",
        "Book",
        "--favorites",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_new_item_from_args() {
    let fields = new_item_from(&sub_matches(&[
        "add",
        "  Dune ",
        "--description",
        "Frank Herbert",
        "--media-type",
        "Book",
        "--favorite",
    ]))
    .unwrap();

    assert_eq!(fields.title.as_deref(), Some("Dune"));
    assert_eq!(fields.description_text.as_deref(), Some("Frank Herbert"));
    assert_eq!(fields.media_type, Some(MediaType::Book));
    assert!(fields.favorite);
    assert!(!fields.is_in_app);
}

#[test]
fn test_custom_media_type_kept() {
    let fields = new_item_from(&sub_matches(&["add", "Field Notes", "-m", "Zine"])).unwrap();
    assert_eq!(
        fields.media_type,
        Some(MediaType::Custom("Zine".to_string()))
    );
}

#[test]
fn test_global_database_arg_after_subcommand() {
    let matches = build_cli()
        .try_get_matches_from(["mediashelf", "stats", "--database", "/tmp/x.db"])
        .unwrap();
    assert_eq!(
        matches.get_one::<String>("database").map(String::as_str),
        Some("/tmp/x.db")
    );
}

#[test]
fn test_invalid_item_id() {
    let result = parse_item_id(&sub_matches(&["info", "not-a-uuid"]));
    assert!(result.is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("12345678", 8), "12345678");
    assert_eq!(truncate("123456789", 8), "12345678...");
    assert_eq!(truncate("héllo wörld", 5), "héllo...");
}

#[tokio::test]
async fn test_add_then_toggle_favorite() {
    let (manager, _temp) = setup_test_manager().await;

    add_item(&manager, &sub_matches(&["add", "Alien", "-m", "Movie"]))
        .await
        .unwrap();

    let items = manager.list_items(&ItemFilter::All).await.unwrap();
    assert_eq!(items.len(), 1);
    let id = items[0].id.to_string();

    toggle_favorite(&manager, &sub_matches(&["favorite", &id]))
        .await
        .unwrap();
    assert!(manager.get_item(items[0].id).await.unwrap().favorite);

    toggle_favorite(&manager, &sub_matches(&["favorite", &id, "--remove"]))
        .await
        .unwrap();
    assert!(!manager.get_item(items[0].id).await.unwrap().favorite);
}

#[tokio::test]
async fn test_forced_delete() {
    let (manager, _temp) = setup_test_manager().await;
    let item = manager.add_item(NewItem::new("Emma")).await.unwrap();
    let id = item.id.to_string();

    delete_item(&manager, &sub_matches(&["delete", &id, "--force"]))
        .await
        .unwrap();

    assert!(manager.list_items(&ItemFilter::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_info_for_missing_item_fails() {
    let (manager, _temp) = setup_test_manager().await;
    let id = ItemId::new().to_string();

    let result = show_item_info(&manager, &sub_matches(&["info", &id])).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_import_from_file() {
    let (manager, _temp) = setup_test_manager().await;

    let mut capture = NamedTempFile::new().unwrap();
    writeln!(capture, "Dune||Frank Herbert;;Emma||Jane Austen;;").unwrap();
    let path = capture.path().to_str().unwrap().to_string();

    import_books(&manager, &sub_matches(&["import", "--from-file", &path, "--dry-run"]))
        .await
        .unwrap();
    assert!(manager.list_items(&ItemFilter::All).await.unwrap().is_empty());

    import_books(&manager, &sub_matches(&["import", "--from-file", &path]))
        .await
        .unwrap();
    let books = manager
        .list_items(&ItemFilter::MediaType(MediaType::Book))
        .await
        .unwrap();
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|b| b.is_in_app));
}

#[tokio::test]
async fn test_import_from_missing_file_fails() {
    let (manager, _temp) = setup_test_manager().await;

    let result = import_books(
        &manager,
        &sub_matches(&["import", "--from-file", "/nonexistent/capture.txt"]),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_stats_runs_on_empty_catalog() {
    let (manager, _temp) = setup_test_manager().await;
    show_stats(&manager).await.unwrap();
}
