//! Integration tests for reconciliation against existing catalog items

use mediashelf_core::{BookRecord, Item, MediaType, NewItem};
use mediashelf_library::{reconcile, reconcile_detailed, CatalogParser};

fn persisted(created: Vec<NewItem>) -> Vec<Item> {
    created.into_iter().map(Item::from_new).collect()
}

fn pairs(created: &[NewItem]) -> Vec<(String, String)> {
    created
        .iter()
        .map(|item| {
            (
                item.title.clone().unwrap_or_default(),
                item.description_text.clone().unwrap_or_default(),
            )
        })
        .collect()
}

#[test]
fn test_existing_book_not_recreated() {
    let existing = persisted(vec![NewItem::from_book(&BookRecord::new(
        "Dune",
        "Frank Herbert",
    ))]);
    let incoming = vec![
        BookRecord::new("Dune", "Frank Herbert"),
        BookRecord::new("Dune Messiah", "Frank Herbert"),
    ];

    let created = reconcile(&incoming, &existing);

    assert_eq!(
        pairs(&created),
        vec![("Dune Messiah".to_string(), "Frank Herbert".to_string())]
    );
}

#[test]
fn test_duplicates_in_one_run_created_once() {
    let incoming = vec![BookRecord::new("A", "B"), BookRecord::new("A", "B")];

    let created = reconcile(&incoming, &[]);

    assert_eq!(pairs(&created), vec![("A".to_string(), "B".to_string())]);
}

#[test]
fn test_second_run_creates_nothing() {
    let incoming =
        CatalogParser::parse("Dune||Frank Herbert;;Emma||Jane Austen;;Emma||Jane Austen;;");

    let first = reconcile(&incoming, &[]);
    assert_eq!(first.len(), 2);

    let existing = persisted(first);
    let second = reconcile_detailed(&incoming, &existing);

    assert!(second.to_create.is_empty());
    assert_eq!(second.skipped_existing, 3);
    assert_eq!(second.skipped_duplicates, 0);
}

#[test]
fn test_same_title_different_author_is_new() {
    let existing = persisted(vec![NewItem::from_book(&BookRecord::new(
        "Collected Poems",
        "Sylvia Plath",
    ))]);

    let created = reconcile(&[BookRecord::new("Collected Poems", "W. B. Yeats")], &existing);
    assert_eq!(created.len(), 1);
}

#[test]
fn test_field_boundary_does_not_collide() {
    let existing = persisted(vec![NewItem::from_book(&BookRecord::new("ab", "c"))]);

    let created = reconcile(&[BookRecord::new("a", "bc")], &existing);
    assert_eq!(created.len(), 1);
}

#[test]
fn test_hand_added_book_counts_as_existing() {
    let existing = persisted(vec![NewItem::new("Emma")
        .with_description("Jane Austen")
        .with_media_type(MediaType::Book)]);

    let created = reconcile(&[BookRecord::new("Emma", "Jane Austen")], &existing);
    assert!(created.is_empty());
}

#[test]
fn test_untyped_item_is_ignored() {
    let existing = persisted(vec![NewItem::new("Emma").with_description("Jane Austen")]);

    let created = reconcile(&[BookRecord::new("Emma", "Jane Austen")], &existing);
    assert_eq!(created.len(), 1);
}

#[test]
fn test_created_items_are_books_from_the_app() {
    let created = reconcile(&[BookRecord::new("Emma", "Jane Austen")], &[]);

    let item = &created[0];
    assert_eq!(item.media_type, Some(MediaType::Book));
    assert!(item.is_in_app);
    assert!(!item.favorite);
    assert!(item.timestamp.as_millis() > 0);
}

#[test]
fn test_output_follows_input_order() {
    let incoming = vec![
        BookRecord::new("C", ""),
        BookRecord::new("A", ""),
        BookRecord::new("B", ""),
    ];

    let titles: Vec<String> = reconcile(&incoming, &[])
        .into_iter()
        .filter_map(|item| item.title)
        .collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
}
