//! API response types and the row → response conversions.
//!
//! The store collapses one-to-many id lists into comma-joined strings
//! (`group_concat`); this module splits them back into integer lists for
//! JSON. A NULL or empty column becomes `[]`, never `[""]`.

use serde::Serialize;

use crate::db::{LineItemRow, OrderRow, ProductRow, ShopRow};

/// A product with the ids of its line items.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub line_item_ids: Vec<i64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            line_item_ids: split_ids(row.line_item_ids),
        }
    }
}

/// An order with its derived total value.
///
/// `value` serializes as `null` for an order with no line items.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub value: Option<i64>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            value: row.value,
        }
    }
}

/// A line item with its per-row derived value.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub id: i64,
    pub product_id: i64,
    pub order_id: i64,
    pub quantity: i64,
    pub value: i64,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            order_id: row.order_id,
            quantity: row.quantity,
            value: row.value,
        }
    }
}

/// A shop with the ids of its linked products and orders.
#[derive(Debug, Clone, Serialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    pub products: Vec<i64>,
    pub orders: Vec<i64>,
}

impl From<ShopRow> for Shop {
    fn from(row: ShopRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            products: split_ids(row.product_ids),
            orders: split_ids(row.order_ids),
        }
    }
}

/// Response body for single-insert endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Created {
    pub id: i64,
}

/// Split a comma-joined id column back into a list.
///
/// NULL and empty-string columns both yield an empty list.
fn split_ids(joined: Option<String>) -> Vec<i64> {
    joined
        .map(|ids| {
            ids.split(',')
                .filter(|part| !part.is_empty())
                .filter_map(|part| part.parse().ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ids_none_is_empty() {
        assert_eq!(split_ids(None), Vec::<i64>::new());
    }

    #[test]
    fn test_split_ids_empty_string_is_empty_not_blank_entry() {
        assert_eq!(split_ids(Some(String::new())), Vec::<i64>::new());
    }

    #[test]
    fn test_split_ids_parses_each_entry() {
        assert_eq!(split_ids(Some("1,2,15".to_string())), vec![1, 2, 15]);
    }

    #[test]
    fn test_product_with_no_line_items_serializes_empty_list() {
        let product = Product::from(ProductRow {
            id: 1,
            name: "Beans".to_string(),
            price: 10,
            line_item_ids: None,
        });

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["line_item_ids"], serde_json::json!([]));
    }

    #[test]
    fn test_order_value_serializes_as_null_when_absent() {
        let order = Order::from(OrderRow { id: 3, value: None });

        let json = serde_json::to_value(&order).unwrap();
        assert!(json["value"].is_null());
    }

    #[test]
    fn test_shop_splits_both_id_lists_independently() {
        let shop = Shop::from(ShopRow {
            id: 1,
            name: "Roastery".to_string(),
            product_ids: Some("4,5".to_string()),
            order_ids: None,
        });

        assert_eq!(shop.products, vec![4, 5]);
        assert!(shop.orders.is_empty());
    }
}
