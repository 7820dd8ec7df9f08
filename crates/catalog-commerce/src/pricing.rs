//! Best-price resolution.
//!
//! Each product is priced against every active discount independently;
//! discounts never stack. The lowest price wins and, on a tie, the
//! discount that comes first keeps it.

use crate::catalog::{PriceResponse, PricedProduct, Product};
use crate::discount::{apply_and_check, Discount, DiscountConditions};

/// Conditions a product presents to discounts.
pub fn conditions_for(product: &Product) -> DiscountConditions {
    DiscountConditions::new(product.category_id.to_string(), product.sku.as_str())
}

/// Lowest price for `product` among the applicable discounts.
pub fn best_price(product: &Product, discounts: &[Discount]) -> PriceResponse {
    let conditions = conditions_for(product);
    let mut price = PriceResponse::undiscounted(product.price);

    for discount in discounts {
        if let Some(candidate) = apply_and_check(discount, &conditions, product.price) {
            if candidate < price.final_price {
                price.final_price = candidate;
                price.discount_percentage = Some(discount.percentage().to_string());
            }
        }
    }

    price
}

/// Price every product, in order.
pub fn price_products(products: &[Product], discounts: &[Discount]) -> Vec<PricedProduct> {
    products
        .iter()
        .map(|product| PricedProduct {
            price: best_price(product, discounts),
            ..PricedProduct::from(product)
        })
        .collect()
}
