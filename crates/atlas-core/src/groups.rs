//! Timeline display groups (one row per category).
//!
//! Categories never influence selection. They only name, color, and order
//! the rows the timeline widget draws items into.

use std::collections::{BTreeMap, BTreeSet};

use atlas_types::{Category, CategoryId, DisplayGroup, DisplayItem};

use crate::materialize::{UNCATEGORIZED_KEY, group_key, style_for_key};

/// Label shown for the uncategorized row.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Human-readable label for a category: name, then alternate label, then a
/// generic `Category <id>`.
pub fn category_label(category: &Category) -> String {
    let name = category.name.trim();
    if !name.is_empty() {
        return name.to_owned();
    }
    let alternate = category.alternate_label.trim();
    if !alternate.is_empty() {
        return alternate.to_owned();
    }
    format!("Category {}", category.id)
}

/// Build the groups referenced by `items`.
///
/// Groups are ordered by label (ties by key), with the uncategorized row
/// last. Keys that do not match any known category get a generic label.
pub fn build_groups(categories: &[Category], items: &[DisplayItem]) -> Vec<DisplayGroup> {
    let used: BTreeSet<&str> = items.iter().map(|item| item.group_key.as_str()).collect();

    let known: BTreeMap<String, String> = categories
        .iter()
        .map(|category| (group_key(Some(category.id)), category_label(category)))
        .collect();

    let mut labelled: Vec<(String, String)> = used
        .iter()
        .filter(|key| **key != UNCATEGORIZED_KEY)
        .map(|key| {
            let label = known.get(*key).cloned().unwrap_or_else(|| {
                key.parse::<i64>()
                    .map_or_else(|_| (*key).to_owned(), |id| format!("Category {}", CategoryId(id)))
            });
            (label, (*key).to_owned())
        })
        .collect();
    labelled.sort();

    if used.contains(UNCATEGORIZED_KEY) {
        labelled.push((UNCATEGORIZED_LABEL.to_owned(), UNCATEGORIZED_KEY.to_owned()));
    }

    labelled
        .into_iter()
        .zip(0_u32..)
        .map(|((label, key), order)| DisplayGroup {
            style_hint: style_for_key(&key),
            key,
            label,
            order,
        })
        .collect()
}
