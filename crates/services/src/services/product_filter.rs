//! Storefront product filtering across the brand → series → model taxonomy.

use std::collections::HashSet;

use db::models::{
    category::{Category, CategoryType},
    product::Product,
};
use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

/// Current storefront selection. Deserializes straight from the products
/// endpoint's query string.
#[derive(Debug, Clone, Copy, Default, Deserialize, TS)]
pub struct ProductSelection {
    pub product_type: Option<Uuid>,
    pub brand: Option<Uuid>,
    pub series: Option<Uuid>,
    pub model: Option<Uuid>,
}

/// Narrow `products` to the current selection, preserving input order.
///
/// The device levels are not independent predicates: the most specific one
/// wins. Picking a model already implies its series and brand, and the
/// coarser selections only scope the options offered in the dependent
/// dropdowns. The product type, by contrast, always applies.
pub fn filter_products(
    products: &[Product],
    categories: &[Category],
    selection: &ProductSelection,
) -> Vec<Product> {
    let mut filtered: Vec<Product> = products.to_vec();

    if let Some(type_id) = selection.product_type {
        filtered.retain(|product| product.product_type_id == Some(type_id));
    }

    if let Some(model_id) = selection.model {
        filtered.retain(|product| product.model_ids.contains(&model_id));
    } else if let Some(series_id) = selection.series {
        let models = models_under_series(categories, series_id);
        filtered.retain(|product| product.model_ids.iter().any(|id| models.contains(id)));
    } else if let Some(brand_id) = selection.brand {
        let models = models_under_brand(categories, brand_id);
        filtered.retain(|product| product.model_ids.iter().any(|id| models.contains(id)));
    }

    filtered
}

fn models_under_series(categories: &[Category], series_id: Uuid) -> HashSet<Uuid> {
    categories
        .iter()
        .filter(|c| c.category_type == CategoryType::Model && c.parent_id == Some(series_id))
        .map(|c| c.id)
        .collect()
}

/// Two-hop join: series under the brand, then models under those series.
fn models_under_brand(categories: &[Category], brand_id: Uuid) -> HashSet<Uuid> {
    let series: HashSet<Uuid> = categories
        .iter()
        .filter(|c| c.category_type == CategoryType::Series && c.parent_id == Some(brand_id))
        .map(|c| c.id)
        .collect();

    categories
        .iter()
        .filter(|c| {
            c.category_type == CategoryType::Model
                && c.parent_id.is_some_and(|parent| series.contains(&parent))
        })
        .map(|c| c.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn category(id: u128, category_type: CategoryType, parent: Option<u128>) -> Category {
        Category {
            id: uid(id),
            name: format!("cat-{id}"),
            category_type,
            parent_id: parent.map(uid),
            sort_order: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(id: u128, product_type: Option<u128>, model_ids: &[u128]) -> Product {
        Product {
            id: uid(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: 10.0,
            product_type_id: product_type.map(uid),
            model_ids: model_ids.iter().copied().map(uid).collect(),
            image_urls: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Two disjoint brand → series → model chains:
    /// b1 (100) → s1 (110) → m1 (111), b2 (200) → s2 (210) → m2 (211).
    fn taxonomy() -> Vec<Category> {
        vec![
            category(100, CategoryType::Brand, None),
            category(110, CategoryType::Series, Some(100)),
            category(111, CategoryType::Model, Some(110)),
            category(200, CategoryType::Brand, None),
            category(210, CategoryType::Series, Some(200)),
            category(211, CategoryType::Model, Some(210)),
        ]
    }

    #[test]
    fn test_no_selection_returns_everything_in_order() {
        let products = vec![product(1, None, &[111]), product(2, None, &[211])];
        let filtered = filter_products(&products, &taxonomy(), &ProductSelection::default());

        let ids: Vec<Uuid> = filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![uid(1), uid(2)]);
    }

    #[test]
    fn test_brand_selection_filters_through_two_hops() {
        let products = vec![product(1, None, &[111]), product(2, None, &[211])];
        let selection = ProductSelection {
            brand: Some(uid(100)),
            ..ProductSelection::default()
        };

        let filtered = filter_products(&products, &taxonomy(), &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, uid(1));
    }

    #[test]
    fn test_series_selection_filters_through_one_hop() {
        let products = vec![product(1, None, &[111]), product(2, None, &[211])];
        let selection = ProductSelection {
            series: Some(uid(210)),
            ..ProductSelection::default()
        };

        let filtered = filter_products(&products, &taxonomy(), &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, uid(2));
    }

    #[test]
    fn test_model_selection_wins_over_brand() {
        // The model belongs to the *other* brand; the more specific
        // selection decides, the stale brand must not over-filter.
        let products = vec![product(1, None, &[111]), product(2, None, &[211])];
        let selection = ProductSelection {
            brand: Some(uid(100)),
            model: Some(uid(211)),
            ..ProductSelection::default()
        };

        let filtered = filter_products(&products, &taxonomy(), &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, uid(2));
    }

    #[test]
    fn test_product_type_always_applies() {
        let products = vec![
            product(1, Some(7), &[111]),
            product(2, Some(8), &[111]),
            product(3, Some(7), &[211]),
        ];
        let selection = ProductSelection {
            product_type: Some(uid(7)),
            brand: Some(uid(100)),
            ..ProductSelection::default()
        };

        let filtered = filter_products(&products, &taxonomy(), &selection);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, uid(1));
    }

    #[test]
    fn test_product_without_models_never_matches_device_filters() {
        let products = vec![product(1, None, &[])];
        let selection = ProductSelection {
            brand: Some(uid(100)),
            ..ProductSelection::default()
        };

        assert!(filter_products(&products, &taxonomy(), &selection).is_empty());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let products = vec![product(1, None, &[111]), product(2, None, &[211])];
        let selection = ProductSelection {
            model: Some(uid(111)),
            ..ProductSelection::default()
        };

        let _ = filter_products(&products, &taxonomy(), &selection);
        assert_eq!(products.len(), 2);
    }
}
