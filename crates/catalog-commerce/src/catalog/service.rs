//! Category and product services.

use std::collections::HashMap;

use catalog_db::{DbError, Filter, Store};
use catalog_observability::Logger;

use crate::catalog::{Category, CategoryRequest, PricedProduct, Product, ProductRequest};
use crate::discount::DiscountService;
use crate::error::CatalogError;
use crate::pricing::price_products;

/// Creates and lists categories.
#[derive(Clone)]
pub struct CategoryService {
    store: Store,
    logger: Logger,
}

impl CategoryService {
    pub fn new(store: Store, logger: Logger) -> Self {
        Self { store, logger }
    }

    pub async fn create_category(&self, request: CategoryRequest) -> Result<Category, CatalogError> {
        let mut category = request.to_category();
        if let Err(e) = self.store.save(&category.identifier(), &mut category).await {
            self.logger.with_error(&e).error("failed to save category");
            return Err(CatalogError::internal("there was an error saving the category"));
        }
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.store.get_filtered(&[]).await.map_err(|e| {
            self.logger.with_error(&e).error("error getting categories");
            CatalogError::internal("error getting categories")
        })
    }
}

/// Creates, fetches and lists products. Listings are priced against the
/// discounts in force at the time of the call.
#[derive(Clone)]
pub struct ProductService {
    store: Store,
    logger: Logger,
    discounts: DiscountService,
}

impl ProductService {
    pub fn new(store: Store, logger: Logger, discounts: DiscountService) -> Self {
        Self {
            store,
            logger,
            discounts,
        }
    }

    pub async fn create_product(&self, request: ProductRequest) -> Result<Product, CatalogError> {
        let mut product = request.to_product();
        let key = product.identifier().to_string();
        if let Err(e) = self.store.save(&key, &mut product).await {
            let message = format!("Error creating product: {}", product.name);
            self.logger.with_error(&e).error(&message);
            return Err(CatalogError::Internal(message));
        }
        Ok(product)
    }

    /// Fetch a product by SKU with its category attached.
    pub async fn get_product(&self, sku: &str) -> Result<Product, CatalogError> {
        let result = async {
            let mut product: Product = self.store.get(sku).await?;
            product.category = self.find_category(product.category_id).await?;
            Ok::<_, DbError>(product)
        }
        .await;

        result.map_err(|e| {
            self.logger
                .with_field("id", sku)
                .with_error(&e)
                .error("error getting product from DB");
            if e.is_not_found() {
                CatalogError::NotFound("Product not found".to_string())
            } else {
                CatalogError::Internal(format!("Error getting Product with ID {}", sku))
            }
        })
    }

    /// Products matching every filter, priced with the best discount.
    pub async fn list_products(&self, filters: &[Filter]) -> Result<Vec<PricedProduct>, CatalogError> {
        self.logger
            .with_field("filters", filters)
            .info("Listing products");

        let products = self.load_products(filters).await.map_err(|e| {
            self.logger
                .with_error(&e)
                .error("Failed to get products from database");
            CatalogError::internal("Failed to get products from database")
        })?;

        let discounts = self.discounts.get_discounts().await.map_err(|e| {
            self.logger
                .with_error(&e)
                .error("Failed to get discounts from database");
            e
        })?;

        let priced = price_products(&products, &discounts);
        self.logger
            .with_field("quantity", priced.len())
            .info("Successfully retrieved products");
        Ok(priced)
    }

    async fn load_products(&self, filters: &[Filter]) -> Result<Vec<Product>, DbError> {
        let mut products: Vec<Product> = self.store.get_filtered(filters).await?;
        if products.is_empty() {
            return Ok(products);
        }

        let categories: HashMap<i64, Category> = self
            .store
            .get_filtered::<Category>(&[])
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        for product in &mut products {
            product.category = categories.get(&product.category_id).cloned();
        }
        Ok(products)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>, DbError> {
        match self.store.get::<Category>(&id.to_string()).await {
            Ok(category) => Ok(Some(category)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount::{DiscountRequest, DiscountTypeRequest, CATEGORY, SKU};
    use catalog_db::testkit::FailingDb;
    use catalog_db::MemoryDb;
    use std::sync::Arc;

    struct Fixture {
        categories: CategoryService,
        products: ProductService,
        discounts: DiscountService,
    }

    async fn fixture() -> Fixture {
        let store = Store::new(Arc::new(MemoryDb::new()), Logger::noop());
        store.migrate(&crate::TABLES).await.unwrap();
        let discounts = DiscountService::new(store.clone(), Logger::noop());
        Fixture {
            categories: CategoryService::new(store.clone(), Logger::noop()),
            products: ProductService::new(store, Logger::noop(), discounts.clone()),
            discounts,
        }
    }

    fn failing() -> ProductService {
        let store = Store::new(Arc::new(FailingDb), Logger::noop());
        let discounts = DiscountService::new(store.clone(), Logger::noop());
        ProductService::new(store, Logger::noop(), discounts)
    }

    fn product(sku: &str, category_id: i64, price: i64) -> ProductRequest {
        ProductRequest {
            sku: sku.into(),
            name: format!("product {}", sku),
            price,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_category() {
        let f = fixture().await;
        let boots = f
            .categories
            .create_category(CategoryRequest { name: "boots".into() })
            .await
            .unwrap();
        assert_eq!(boots.id, 1);

        let err = f
            .categories
            .create_category(CategoryRequest { name: "boots".into() })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "there was an error saving the category");
        assert_eq!(f.categories.list_categories().await.unwrap(), vec![boots]);
    }

    #[tokio::test]
    async fn test_get_product_with_category() {
        let f = fixture().await;
        f.categories
            .create_category(CategoryRequest { name: "boots".into() })
            .await
            .unwrap();
        f.products.create_product(product("000001", 1, 89000)).await.unwrap();

        let p = f.products.get_product("000001").await.unwrap();
        assert_eq!(p.price, 89000);
        assert_eq!(p.category_name(), "boots");
    }

    #[tokio::test]
    async fn test_get_product_missing() {
        let f = fixture().await;
        let err = f.products.get_product("nope").await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound("Product not found".into()));
    }

    #[tokio::test]
    async fn test_duplicate_sku() {
        let f = fixture().await;
        f.products.create_product(product("000001", 1, 1)).await.unwrap();
        let err = f.products.create_product(product("000001", 1, 2)).await.unwrap_err();
        assert_eq!(err.message(), "Error creating product: product 000001");
    }

    #[tokio::test]
    async fn test_list_products_filtered_and_priced() {
        let f = fixture().await;
        for name in ["boots", "sandals"] {
            f.categories
                .create_category(CategoryRequest { name: name.into() })
                .await
                .unwrap();
        }
        for kind in ["category", "sku", "general"] {
            f.discounts
                .create_discount_type(DiscountTypeRequest { kind: kind.into() })
                .await
                .unwrap();
        }
        f.discounts
            .create_discount(DiscountRequest {
                percentage: 30,
                discount_type_id: CATEGORY,
                target: "1".into(),
            })
            .await
            .unwrap();
        f.discounts
            .create_discount(DiscountRequest {
                percentage: 15,
                discount_type_id: SKU,
                target: "000004".into(),
            })
            .await
            .unwrap();

        f.products.create_product(product("000001", 1, 89000)).await.unwrap();
        f.products.create_product(product("000004", 2, 79500)).await.unwrap();

        let all = f.products.list_products(&[]).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].category, "boots");
        assert_eq!(all[0].price.final_price, 62300);
        assert_eq!(all[1].category, "sandals");
        assert_eq!(all[1].price.final_price, 67575);
        assert_eq!(all[1].price.discount_percentage.as_deref(), Some("15"));

        let cheap = f
            .products
            .list_products(&[Product::price_filter("80000", "<=")])
            .await
            .unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].sku, "000004");

        let none = f
            .products
            .list_products(&[Product::category_filter(3, "=")])
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_store_failures() {
        let svc = failing();

        let err = svc.create_product(product("000001", 1, 1)).await.unwrap_err();
        assert_eq!(err.message(), "Error creating product: product 000001");

        let err = svc.get_product("000001").await.unwrap_err();
        assert_eq!(err, CatalogError::Internal("Error getting Product with ID 000001".into()));

        let err = svc.list_products(&[]).await.unwrap_err();
        assert_eq!(err.message(), "Failed to get products from database");
    }
}
