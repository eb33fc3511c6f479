//! Demo data seeding.
//!
//! Populates an empty store with one shop, a few products and orders, and
//! line items linking them, so the API has something to serve out of the
//! box. The whole sequence is one chain: later steps pick the ids created
//! by earlier ones out of the accumulated results.

use futures::FutureExt;

use shoplite_chain::{Chain, ChainError};

use super::{Store, StoreError};

/// Seed demo data into an empty store.
///
/// A store that already contains shops is left untouched; re-running a
/// file-backed store would otherwise trip the unique shop name.
///
/// # Errors
///
/// Returns the name of the failed seeding step and its [`StoreError`].
pub async fn seed_demo_data(store: &Store) -> Result<(), ChainError<StoreError>> {
    let shops = store.list_shops(0).await.map_err(|source| ChainError {
        step: "shops".to_string(),
        source,
    })?;
    if !shops.is_empty() {
        tracing::debug!("store already holds data, skipping demo seed");
        return Ok(());
    }

    let results = Chain::new()
        .step("shop", |_| store.create_shop("Shoplite Demo").boxed())
        .step("espresso", |_| {
            store.create_product("Espresso Beans", 25).boxed()
        })
        .step("grinder", |_| store.create_product("Hand Grinder", 120).boxed())
        .step("kettle", |_| {
            store.create_product("Gooseneck Kettle", 45).boxed()
        })
        .step("filters", |_| store.create_product("Filter Papers", 4).boxed())
        .step("order1", |_| store.create_order().boxed())
        .step("order2", |_| store.create_order().boxed())
        .step("order3", |_| store.create_order().boxed())
        .step("line1", |done| {
            let (product, order) = (done["espresso"], done["order1"]);
            store.create_line_item(product, order, 2).boxed()
        })
        .step("line2", |done| {
            let (product, order) = (done["filters"], done["order1"]);
            store.create_line_item(product, order, 5).boxed()
        })
        .step("line3", |done| {
            let (product, order) = (done["grinder"], done["order2"]);
            store.create_line_item(product, order, 1).boxed()
        })
        .step("shop_espresso", |done| {
            let (shop, product) = (done["shop"], done["espresso"]);
            store.add_product_to_shop(shop, product).boxed()
        })
        .step("shop_grinder", |done| {
            let (shop, product) = (done["shop"], done["grinder"]);
            store.add_product_to_shop(shop, product).boxed()
        })
        .step("shop_kettle", |done| {
            let (shop, product) = (done["shop"], done["kettle"]);
            store.add_product_to_shop(shop, product).boxed()
        })
        .step("shop_filters", |done| {
            let (shop, product) = (done["shop"], done["filters"]);
            store.add_product_to_shop(shop, product).boxed()
        })
        .step("shop_order1", |done| {
            let (shop, order) = (done["shop"], done["order1"]);
            store.add_order_to_shop(shop, order).boxed()
        })
        .step("shop_order2", |done| {
            let (shop, order) = (done["shop"], done["order2"]);
            store.add_order_to_shop(shop, order).boxed()
        })
        .step("shop_order3", |done| {
            let (shop, order) = (done["shop"], done["order3"]);
            store.add_order_to_shop(shop, order).boxed()
        })
        .run()
        .await?;

    tracing::info!(entities = results.len(), "seeded demo data");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn ready_store() -> Store {
        let store = Store::new();
        store.connect("sqlite::memory:").await.unwrap();
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_seed_populates_an_empty_store() {
        let store = ready_store().await;
        seed_demo_data(&store).await.unwrap();

        assert_eq!(store.list_shops(0).await.unwrap().len(), 1);
        assert_eq!(store.list_products(0).await.unwrap().len(), 4);
        assert_eq!(store.list_orders(0).await.unwrap().len(), 3);
        assert_eq!(store.list_line_items(0).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_seed_is_skipped_when_data_exists() {
        let store = ready_store().await;
        seed_demo_data(&store).await.unwrap();
        seed_demo_data(&store).await.unwrap();

        assert_eq!(store.list_shops(0).await.unwrap().len(), 1);
        assert_eq!(store.list_products(0).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_seeded_orders_carry_summed_values() {
        let store = ready_store().await;
        seed_demo_data(&store).await.unwrap();

        let orders = store.list_orders(0).await.unwrap();
        // order1: 2 × 25 + 5 × 4; order2: 1 × 120; order3: empty.
        assert_eq!(orders[0].value, Some(70));
        assert_eq!(orders[1].value, Some(120));
        assert_eq!(orders[2].value, None);
    }
}
