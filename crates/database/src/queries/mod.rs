//! Database query modules

pub mod items;

pub use items::{
    count_items, create_item, create_items, delete_item, get_item, list_items,
    list_items_matching, update_item,
};
