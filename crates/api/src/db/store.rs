//! The SQLite-backed data store.
//!
//! [`Store`] is the single point of access to persistent storage. It owns
//! one SQLite session (no pool): every operation goes through the same
//! connection behind an async mutex, so independent calls serialize at the
//! store. The session lifecycle is explicit: [`Store::connect`] must
//! complete before any other operation, and [`Store::release`] closes the
//! session, after which operations fail with [`StoreError::NotConnected`].

use std::str::FromStr;

use futures::FutureExt;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection};
use tokio::sync::Mutex;

use shoplite_chain::{Chain, ChainError};

use super::StoreError;
use super::queries;

/// Rows returned per listing page.
const DEFAULT_RESULTS_PER_PAGE: i64 = 20;

// =============================================================================
// Schema
// =============================================================================

// AUTOINCREMENT keeps ids monotonic and never reused, which is what makes
// id-ordered pagination stable.

const CREATE_PRODUCT_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS product (\
 id INTEGER PRIMARY KEY AUTOINCREMENT,\
 name TEXT NOT NULL,\
 price INTEGER NOT NULL)";

const CREATE_ORDERS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS orders (\
 id INTEGER PRIMARY KEY AUTOINCREMENT)";

const CREATE_LINE_ITEM_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS line_item (\
 id INTEGER PRIMARY KEY AUTOINCREMENT,\
 product_id INTEGER NOT NULL REFERENCES product(id),\
 order_id INTEGER NOT NULL REFERENCES orders(id),\
 quantity INTEGER NOT NULL)";

const CREATE_SHOP_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS shop (\
 id INTEGER PRIMARY KEY AUTOINCREMENT,\
 name TEXT NOT NULL UNIQUE)";

const CREATE_SHOP_PRODUCT_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS shop_product (\
 shop_id INTEGER NOT NULL REFERENCES shop(id),\
 product_id INTEGER NOT NULL REFERENCES product(id),\
 PRIMARY KEY (shop_id, product_id))";

const CREATE_SHOP_ORDER_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS shop_order (\
 shop_id INTEGER NOT NULL REFERENCES shop(id),\
 order_id INTEGER NOT NULL REFERENCES orders(id),\
 PRIMARY KEY (shop_id, order_id))";

// =============================================================================
// Write statements
// =============================================================================

const INSERT_PRODUCT: &str = "INSERT INTO product (name, price) VALUES (?, ?)";
const INSERT_ORDER: &str = "INSERT INTO orders DEFAULT VALUES";
const INSERT_LINE_ITEM: &str =
    "INSERT INTO line_item (product_id, order_id, quantity) VALUES (?, ?, ?)";
const INSERT_SHOP: &str = "INSERT INTO shop (name) VALUES (?)";
const INSERT_SHOP_PRODUCT: &str = "INSERT INTO shop_product (shop_id, product_id) VALUES (?, ?)";
const INSERT_SHOP_ORDER: &str = "INSERT INTO shop_order (shop_id, order_id) VALUES (?, ?)";

// =============================================================================
// Row Types
// =============================================================================

/// A product row with its line-item ids collapsed into one column.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: i64,
    /// Comma-joined line-item ids; NULL when the product has none.
    pub line_item_ids: Option<String>,
}

/// An order row with its derived total value.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    /// Sum of price × quantity over the order's line items; NULL (not
    /// zero) for an order with no line items.
    pub value: Option<i64>,
}

/// A line item row with its per-row derived value.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LineItemRow {
    pub id: i64,
    pub product_id: i64,
    pub order_id: i64,
    pub quantity: i64,
    /// Product price × quantity for this row.
    pub value: i64,
}

/// A shop row with its linked product and order ids collapsed into columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopRow {
    pub id: i64,
    pub name: String,
    /// Comma-joined product ids; NULL when the shop has no linked products.
    pub product_ids: Option<String>,
    /// Comma-joined order ids; NULL when the shop has no linked orders.
    pub order_ids: Option<String>,
}

// =============================================================================
// Store
// =============================================================================

/// Single point of access to the SQLite database.
///
/// Construct with [`Store::new`], then [`Store::connect`] and
/// [`Store::initialize`] before issuing reads or writes.
pub struct Store {
    conn: Mutex<Option<SqliteConnection>>,
    page_size: i64,
}

impl Store {
    /// Create a store with no active session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            conn: Mutex::new(None),
            page_size: DEFAULT_RESULTS_PER_PAGE,
        }
    }

    /// Open the SQLite session.
    ///
    /// Accepts `sqlite::memory:` or a file URL such as `sqlite:shoplite.db`
    /// (the file is created if missing). Foreign-key enforcement is enabled
    /// so dangling references surface as [`StoreError::Constraint`].
    /// Reconnecting replaces the previous session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] when the URL is invalid or the
    /// database cannot be opened.
    pub async fn connect(&self, url: &str) -> Result<(), StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(StoreError::Connection)?
            .create_if_missing(true)
            .foreign_keys(true);

        let conn = options.connect().await.map_err(StoreError::Connection)?;
        *self.conn.lock().await = Some(conn);
        Ok(())
    }

    /// Close the session. Subsequent operations fail with
    /// [`StoreError::NotConnected`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotConnected`] if no session is open, or
    /// [`StoreError::Connection`] if teardown fails.
    pub async fn release(&self) -> Result<(), StoreError> {
        let conn = self
            .conn
            .lock()
            .await
            .take()
            .ok_or(StoreError::NotConnected)?;
        conn.close().await.map_err(StoreError::Connection)
    }

    /// Cheap liveness probe for the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error when the session is missing or unresponsive.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        sqlx::query("SELECT 1").fetch_one(&mut *conn).await?;
        Ok(())
    }

    /// Ensure all tables exist. Idempotent; calling twice is a no-op.
    ///
    /// Each table is a named chain step, so a failure reports which table's
    /// DDL broke.
    ///
    /// # Errors
    ///
    /// Returns the failing step's name and the underlying [`StoreError`].
    pub async fn initialize(&self) -> Result<(), ChainError<StoreError>> {
        Chain::new()
            .step("product", |_| self.create_table(CREATE_PRODUCT_TABLE).boxed())
            .step("orders", |_| self.create_table(CREATE_ORDERS_TABLE).boxed())
            .step("line_item", |_| {
                self.create_table(CREATE_LINE_ITEM_TABLE).boxed()
            })
            .step("shop", |_| self.create_table(CREATE_SHOP_TABLE).boxed())
            .step("shop_product", |_| {
                self.create_table(CREATE_SHOP_PRODUCT_TABLE).boxed()
            })
            .step("shop_order", |_| {
                self.create_table(CREATE_SHOP_ORDER_TABLE).boxed()
            })
            .run()
            .await?;
        Ok(())
    }

    // =========================================================================
    // Paginated reads
    // =========================================================================

    /// List the products for the given zero-based page (at most 20 rows,
    /// ids ascending). Negative pages are clamped to page 0.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the query fails.
    pub async fn list_products(&self, page: i64) -> Result<Vec<ProductRow>, StoreError> {
        self.fetch_page(queries::PRODUCT_SELECT, queries::PRODUCT_ID, page)
            .await
    }

    /// List the orders for the given zero-based page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the query fails.
    pub async fn list_orders(&self, page: i64) -> Result<Vec<OrderRow>, StoreError> {
        self.fetch_page(queries::ORDER_SELECT, queries::ORDER_ID, page)
            .await
    }

    /// List the line items for the given zero-based page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the query fails.
    pub async fn list_line_items(&self, page: i64) -> Result<Vec<LineItemRow>, StoreError> {
        self.fetch_page(queries::LINE_ITEM_SELECT, queries::LINE_ITEM_ID, page)
            .await
    }

    /// List the shops for the given zero-based page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the query fails.
    pub async fn list_shops(&self, page: i64) -> Result<Vec<ShopRow>, StoreError> {
        self.fetch_page(queries::SHOP_SELECT, queries::SHOP_ID, page)
            .await
    }

    // =========================================================================
    // Get by id
    // =========================================================================

    /// Fetch one product by id; `Ok(None)` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the query fails.
    pub async fn get_product(&self, id: i64) -> Result<Option<ProductRow>, StoreError> {
        self.fetch_by_id(queries::PRODUCT_SELECT, queries::PRODUCT_ID, id)
            .await
    }

    /// Fetch one order by id; `Ok(None)` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the query fails.
    pub async fn get_order(&self, id: i64) -> Result<Option<OrderRow>, StoreError> {
        self.fetch_by_id(queries::ORDER_SELECT, queries::ORDER_ID, id)
            .await
    }

    /// Fetch one shop by id; `Ok(None)` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the query fails.
    pub async fn get_shop(&self, id: i64) -> Result<Option<ShopRow>, StoreError> {
        self.fetch_by_id(queries::SHOP_SELECT, queries::SHOP_ID, id)
            .await
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Insert a product, resolving with its newly assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the insert fails.
    pub async fn create_product(&self, name: &str, price: i64) -> Result<i64, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let result = sqlx::query(INSERT_PRODUCT)
            .bind(name)
            .bind(price)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.last_insert_rowid())
    }

    /// Insert an order, resolving with its newly assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the session is missing or the insert fails.
    pub async fn create_order(&self) -> Result<i64, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let result = sqlx::query(INSERT_ORDER)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.last_insert_rowid())
    }

    /// Insert a line item for the given product, order, and quantity,
    /// resolving with its newly assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] when `product_id` or `order_id`
    /// does not reference an existing row.
    pub async fn create_line_item(
        &self,
        product_id: i64,
        order_id: i64,
        quantity: i64,
    ) -> Result<i64, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let result = sqlx::query(INSERT_LINE_ITEM)
            .bind(product_id)
            .bind(order_id)
            .bind(quantity)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.last_insert_rowid())
    }

    /// Insert a shop, resolving with its newly assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] when the name is already taken.
    pub async fn create_shop(&self, name: &str) -> Result<i64, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let result = sqlx::query(INSERT_SHOP)
            .bind(name)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.last_insert_rowid())
    }

    // =========================================================================
    // Links
    // =========================================================================

    /// Link a product to a shop, resolving with the association rowid.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] when either id does not exist or
    /// the pair is already linked.
    pub async fn add_product_to_shop(
        &self,
        shop_id: i64,
        product_id: i64,
    ) -> Result<i64, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let result = sqlx::query(INSERT_SHOP_PRODUCT)
            .bind(shop_id)
            .bind(product_id)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.last_insert_rowid())
    }

    /// Link an order to a shop, resolving with the association rowid.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] when either id does not exist or
    /// the pair is already linked.
    pub async fn add_order_to_shop(&self, shop_id: i64, order_id: i64) -> Result<i64, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let result = sqlx::query(INSERT_SHOP_ORDER)
            .bind(shop_id)
            .bind(order_id)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.last_insert_rowid())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Run one selection template with pagination clauses appended.
    ///
    /// The clause columns come from the static query catalog; only the
    /// limit/offset values are bound.
    async fn fetch_page<R>(
        &self,
        template: &str,
        id_column: &str,
        page: i64,
    ) -> Result<Vec<R>, StoreError>
    where
        R: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let page = page.max(0);
        let offset = page.saturating_mul(self.page_size);
        let sql =
            format!("{template} GROUP BY {id_column} ORDER BY {id_column} LIMIT ? OFFSET ?");

        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let rows = sqlx::query_as::<_, R>(&sql)
            .bind(self.page_size)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    /// Run one selection template with an identity clause appended.
    async fn fetch_by_id<R>(
        &self,
        template: &str,
        id_column: &str,
        id: i64,
    ) -> Result<Option<R>, StoreError>
    where
        R: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = format!("{template} WHERE {id_column} = ? GROUP BY {id_column}");

        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        let row = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn create_table(&self, ddl: &str) -> Result<(), StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = connected(&mut guard)?;
        sqlx::query(ddl).execute(&mut *conn).await?;
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrow the live connection out of the session slot.
fn connected(
    guard: &mut Option<SqliteConnection>,
) -> Result<&mut SqliteConnection, StoreError> {
    guard.as_mut().ok_or(StoreError::NotConnected)
}

/// Classify a write failure: uniqueness and referential-integrity
/// violations are the caller's [`StoreError::Constraint`]; everything else
/// stays a plain database error.
fn write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err
        && (db.is_unique_violation() || db.is_foreign_key_violation())
    {
        return StoreError::Constraint(err);
    }
    StoreError::Database(err)
}
