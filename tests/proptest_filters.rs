//! Property-based tests using proptest
//!
//! These tests verify the search filter, the store's filtered view, JSON
//! decoding of list rows and input validation using randomized inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use tcat::error::{format_api_error, FetchError};
use tcat::model::{is_hex_color, Category, Product, ProductPayload};
use tcat::resource::store::{text_filter, ResourceStore};

/// Generate an arbitrary category row
fn arb_category() -> impl Strategy<Value = Category> {
    (1i64..10_000, "[A-Za-z][A-Za-z0-9 ]{0,20}").prop_map(|(id, name)| Category {
        id,
        name,
        products: Vec::new(),
    })
}

/// Generate a list of categories
fn arb_category_list() -> impl Strategy<Value = Vec<Category>> {
    prop::collection::vec(arb_category(), 0..60)
}

/// Generate a product row as the API would send it
fn arb_product_json() -> impl Strategy<Value = Value> {
    (
        1i64..10_000,
        "[A-Za-z][A-Za-z0-9 ]{0,30}",
        prop::option::of("[a-z ]{0,12}"),
        prop::option::of("[a-z ]{0,40}"),
        1i64..500,
    )
        .prop_map(|(id, name, sub_name, description, category_id)| {
            json!({
                "id": id,
                "name": name,
                "subName": sub_name,
                "description": description,
                "categoryId": category_id,
                "photos": null
            })
        })
}

proptest! {
    /// An empty term selects every row, in order
    #[test]
    fn empty_term_is_identity(items in arb_category_list()) {
        let indices = text_filter(&items, "");
        prop_assert_eq!(indices, (0..items.len()).collect::<Vec<_>>());
    }

    /// Every selected row matches and every unselected row does not
    #[test]
    fn filter_is_exact(items in arb_category_list(), term in "[a-z]{1,3}") {
        let indices = text_filter(&items, &term);
        for (idx, item) in items.iter().enumerate() {
            let matches = item.name.to_lowercase().contains(&term);
            prop_assert_eq!(indices.contains(&idx), matches);
        }
    }

    /// The filtered view is a subsequence of the list
    #[test]
    fn filter_preserves_order(items in arb_category_list(), term in "[a-z]{0,2}") {
        let indices = text_filter(&items, &term);
        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(indices.iter().all(|&i| i < items.len()));
    }

    /// Case of the search term is irrelevant
    #[test]
    fn filter_is_case_insensitive(items in arb_category_list(), term in "[a-zA-Z]{1,3}") {
        prop_assert_eq!(
            text_filter(&items, &term.to_uppercase()),
            text_filter(&items, &term.to_lowercase())
        );
    }

    /// Applying the same term twice changes nothing
    #[test]
    fn apply_is_idempotent(items in arb_category_list(), term in "[a-z]{0,3}") {
        let mut store = ResourceStore::new();
        store.replace(items);
        store.apply_text_filter(&term);
        let first = store.filtered_indices().to_vec();
        store.apply_text_filter(&term);
        prop_assert_eq!(store.filtered_indices(), first.as_slice());
    }

    /// A term typed before a reload still applies to the new list
    #[test]
    fn replace_reapplies_term(
        before in arb_category_list(),
        after in arb_category_list(),
        term in "[a-z]{1,2}",
    ) {
        let mut store = ResourceStore::new();
        store.replace(before);
        store.apply_text_filter(&term);
        store.replace(after.clone());

        let expected = text_filter(&after, &term);
        prop_assert_eq!(store.filtered_indices(), expected.as_slice());
        prop_assert_eq!(store.items(), after.as_slice());
    }

    /// The cursor never points past the filtered view
    #[test]
    fn selection_stays_in_bounds(
        items in arb_category_list(),
        term in "[a-z]{0,2}",
        moves in prop::collection::vec(0u8..4, 0..30),
    ) {
        let mut store = ResourceStore::new();
        store.replace(items);
        for m in moves {
            match m {
                0 => store.next(),
                1 => store.previous(),
                2 => store.go_to_bottom(),
                _ => store.apply_text_filter(&term),
            }
            let len = store.filtered_len();
            prop_assert!(len == 0 || store.selected < len);
        }
    }

    /// Product rows decode whether optional text fields are null or present
    #[test]
    fn product_rows_decode(row in arb_product_json()) {
        let product: Product = serde_json::from_value(row.clone()).unwrap();
        prop_assert_eq!(product.id, row["id"].as_i64().unwrap());
        prop_assert_eq!(product.sub_name, row["subName"].as_str().unwrap_or("").to_string());
        prop_assert!(product.photos.is_empty());
    }

    /// Generated #RRGGBB strings are always accepted
    #[test]
    fn valid_hex_colors_accepted(digits in "[0-9a-fA-F]{6}") {
        let hex = format!("#{}", digits);
        prop_assert!(is_hex_color(&hex));
    }

    /// Wrong lengths or missing '#' are rejected
    #[test]
    fn malformed_hex_colors_rejected(digits in "[0-9a-f]{0,5}|[0-9a-f]{7,9}") {
        let hex = format!("#{}", digits);
        prop_assert!(!is_hex_color(&hex));
        prop_assert!(!is_hex_color(&digits));
    }

    /// Blank names never validate
    #[test]
    fn blank_names_rejected(spaces in " {0,5}", category_id in 1i64..100) {
        let payload = ProductPayload {
            name: spaces,
            sub_name: String::new(),
            description: String::new(),
            category_id,
        };
        prop_assert!(payload.validate().is_err());
    }

    /// Status-line messages never echo the raw server body
    #[test]
    fn api_errors_hide_server_body(status in 400u16..600, body in "[a-z]{12,20}") {
        let err = FetchError::new(Some(status), body.clone());
        prop_assert!(!format_api_error(&err).contains(&body));
    }
}
