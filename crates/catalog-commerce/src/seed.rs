//! Initial catalog data.

use catalog_observability::Logger;

use crate::catalog::{CategoryRequest, CategoryService, ProductRequest, ProductService};
use crate::discount::{DiscountRequest, DiscountService, DiscountTypeRequest};
use crate::error::CatalogError;

const PRODUCTS: &[(&str, &str, i64, usize)] = &[
    ("000001", "BV Lean leather ankle boots", 89000, 0),
    ("000002", "BV Lean leather ankle boots", 99000, 0),
    ("000003", "Ashlington leather ankle boots", 71000, 0),
    ("000004", "Naima embellished suede sandals", 79500, 1),
    ("000005", "Nathane leather sneakers", 59000, 2),
];

/// Insert the starter catalog: three categories, five products, the three
/// discount types and one discount of each type. Does nothing when any
/// category already exists.
pub async fn seed_catalog(
    categories: &CategoryService,
    products: &ProductService,
    discounts: &DiscountService,
    logger: &Logger,
) -> Result<(), CatalogError> {
    if !categories.list_categories().await?.is_empty() {
        logger.info("catalog already seeded");
        return Ok(());
    }

    let mut category_ids = Vec::new();
    for name in ["boots", "sandals", "sneakers"] {
        let category = categories
            .create_category(CategoryRequest { name: name.into() })
            .await?;
        category_ids.push(category.id);
    }

    for (sku, name, price, category) in PRODUCTS {
        products
            .create_product(ProductRequest {
                sku: sku.to_string(),
                name: name.to_string(),
                price: *price,
                category_id: category_ids[*category],
            })
            .await?;
    }

    let mut type_ids = Vec::new();
    for kind in ["category", "sku", "general"] {
        let discount_type = discounts
            .create_discount_type(DiscountTypeRequest { kind: kind.into() })
            .await?;
        type_ids.push(discount_type.id);
    }

    let seeded = [
        (type_ids[0], category_ids[0].to_string(), 30),
        (type_ids[1], PRODUCTS[2].0.to_string(), 15),
        (type_ids[2], String::new(), 0),
    ];
    for (discount_type_id, target, percentage) in seeded {
        discounts
            .create_discount(DiscountRequest {
                percentage,
                discount_type_id,
                target,
            })
            .await?;
    }

    logger
        .with_field("categories", category_ids.len())
        .with_field("products", PRODUCTS.len())
        .info("catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::Discount;
    use catalog_db::{MemoryDb, Store};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seeded_listing() {
        let store = Store::new(Arc::new(MemoryDb::new()), Logger::noop());
        store.migrate(&crate::TABLES).await.unwrap();
        let categories = CategoryService::new(store.clone(), Logger::noop());
        let discounts = DiscountService::new(store.clone(), Logger::noop());
        let products = ProductService::new(store, Logger::noop(), discounts.clone());

        seed_catalog(&categories, &products, &discounts, &Logger::noop())
            .await
            .unwrap();
        // Second run is a no-op.
        seed_catalog(&categories, &products, &discounts, &Logger::noop())
            .await
            .unwrap();

        let listed = products.list_products(&[]).await.unwrap();
        let finals: Vec<(&str, i64, Option<&str>)> = listed
            .iter()
            .map(|p| {
                (
                    p.sku.as_str(),
                    p.price.final_price,
                    p.price.discount_percentage.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            finals,
            vec![
                ("000001", 62300, Some("30")),
                ("000002", 69300, Some("30")),
                ("000003", 49700, Some("30")),
                ("000004", 79500, None),
                ("000005", 59000, None),
            ]
        );
        assert_eq!(listed[3].category, "sandals");

        let all = discounts.get_discounts().await.unwrap();
        assert!(matches!(
            all.as_slice(),
            [Discount::Category(_), Discount::Sku(_), Discount::General(_)]
        ));
    }
}
