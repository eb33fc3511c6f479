//! Read templates for the SQLite store.
//!
//! One parameterized selection per entity, each expressing the entity's
//! joins and derived columns. [`super::Store`] composes these with
//! pagination (`GROUP BY … ORDER BY … LIMIT ? OFFSET ?`) or identity
//! (`WHERE <id> = ? GROUP BY <id>`) clauses; the `*_ID` fragments below are
//! the grouping/ordering columns for that composition. Values are always
//! bound, never spliced into the SQL text.

/// Products with the ids of their line items collapsed into one column.
///
/// `line_item_ids` is NULL for a product with no line items.
pub(crate) const PRODUCT_SELECT: &str = "\
SELECT product.id AS id, product.name AS name, product.price AS price, \
       group_concat(line_item.id) AS line_item_ids \
  FROM product \
  LEFT JOIN line_item ON product.id = line_item.product_id";

/// Grouping/ordering column for product reads.
pub(crate) const PRODUCT_ID: &str = "product.id";

/// Orders with their total value summed over line items.
///
/// The double left join keeps orders with no line items in the listing;
/// such orders carry a NULL `value` (not zero).
pub(crate) const ORDER_SELECT: &str = "\
SELECT orders.id AS id, SUM(product.price * line_item.quantity) AS value \
  FROM orders \
  LEFT JOIN line_item ON orders.id = line_item.order_id \
  LEFT JOIN product ON line_item.product_id = product.id";

/// Grouping/ordering column for order reads.
pub(crate) const ORDER_ID: &str = "orders.id";

/// Line items with their per-row value (price × quantity).
pub(crate) const LINE_ITEM_SELECT: &str = "\
SELECT line_item.id AS id, line_item.product_id AS product_id, \
       line_item.order_id AS order_id, line_item.quantity AS quantity, \
       product.price * line_item.quantity AS value \
  FROM line_item \
  LEFT JOIN product ON line_item.product_id = product.id";

/// Grouping/ordering column for line item reads.
pub(crate) const LINE_ITEM_ID: &str = "line_item.id";

/// Shops with their linked product and order ids as two collapsed columns.
///
/// The inner subquery collapses the product links first so the outer
/// order-link join cannot multiply product rows; each id list is NULL when
/// the shop has no links of that kind.
pub(crate) const SHOP_SELECT: &str = "\
SELECT id, name, product_ids, group_concat(shop_order.order_id) AS order_ids \
  FROM (SELECT shop.id AS id, shop.name AS name, \
               group_concat(shop_product.product_id) AS product_ids \
          FROM shop \
          LEFT JOIN shop_product ON shop.id = shop_product.shop_id \
         GROUP BY shop.id) \
  LEFT JOIN shop_order ON id = shop_order.shop_id";

/// Grouping/ordering column for shop reads.
pub(crate) const SHOP_ID: &str = "id";
