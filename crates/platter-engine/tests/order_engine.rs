//! Checkout and order history.

mod common;

use platter_core::{FulfillmentMode, OrderStatus, PickupType};
use platter_engine::ErrorKind;

#[tokio::test]
async fn test_place_order_on_empty_cart_fails() {
    let platter = common::setup().await;
    let orders = platter.orders();

    // No cart at all.
    let err = orders.place_order("alice", &common::pickup()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCart);

    // A cart that was emptied.
    platter.carts().add_item("alice", "p-x", 1).await.unwrap();
    platter.carts().remove_item("alice", "p-x").await.unwrap();
    let err = orders.place_order("alice", &common::pickup()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCart);

    assert_eq!(platter.db().orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_cart_is_reported_before_validation() {
    let platter = common::setup().await;

    let err = platter
        .orders()
        .place_order("alice", &common::delivery("", ""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCart);
}

#[tokio::test]
async fn test_place_order_deletes_cart_and_freezes_total() {
    let platter = common::setup().await;
    let carts = platter.carts();
    carts.add_item("alice", "p-x", 2).await.unwrap();
    let before = carts.add_item("alice", "p-y", 1).await.unwrap();

    let order = platter
        .orders()
        .place_order("alice", &common::pickup())
        .await
        .unwrap();

    assert_eq!(order.total_cents, before.total_cents);
    assert_eq!(order.total_cents, 1350);
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.fulfillment.mode(), FulfillmentMode::Pickup);
    assert_eq!(order.fulfillment.pickup_type(), Some(PickupType::DineIn));
    assert_eq!(order.user.as_ref().unwrap().username, "alice");

    assert!(carts.get_cart("alice").await.unwrap().items.is_empty());
    assert!(platter.db().carts().load("alice").await.unwrap().is_none());

    // Later price changes do not touch the order.
    platter.db().catalog().update_price("p-x", 9_999).await.unwrap();
    let history = platter
        .orders()
        .get_orders(&common::customer("alice"))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].total_cents, 1350);
    assert_eq!(history[0].items[0].unit_price_cents, 500);
    assert_eq!(history[0].items[0].line_total_cents, 1000);
}

#[tokio::test]
async fn test_delivery_requires_region() {
    let platter = common::setup().await;
    platter.carts().add_item("alice", "p-x", 1).await.unwrap();

    let err = platter
        .orders()
        .place_order("alice", &common::delivery("", "Street 1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    // The failed checkout left the cart alone.
    let cart = platter.carts().get_cart("alice").await.unwrap();
    assert_eq!(cart.total_cents, 500);
    assert_eq!(platter.db().orders().count().await.unwrap(), 0);

    let order = platter
        .orders()
        .place_order("alice", &common::delivery("Amman", "Street 1"))
        .await
        .unwrap();
    assert_eq!(order.fulfillment.region(), Some("Amman"));
    assert_eq!(order.fulfillment.delivery_address(), Some("Street 1"));
    assert_eq!(order.fulfillment.pickup_type(), None);
}

#[tokio::test]
async fn test_customer_details_are_checked() {
    let platter = common::setup().await;
    platter.carts().add_item("alice", "p-x", 1).await.unwrap();
    let orders = platter.orders();

    let mut request = common::pickup();
    request.customer_name = "   ".to_string();
    let err = orders.place_order("alice", &request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let mut request = common::pickup();
    request.customer_phone = String::new();
    let err = orders.place_order("alice", &request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let mut request = common::pickup();
    request.pickup_type = Some("drive-through".to_string());
    let err = orders.place_order("alice", &request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    let mut request = common::pickup();
    request.fulfillment = "drone".to_string();
    let err = orders.place_order("alice", &request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);

    assert_eq!(platter.db().orders().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_vanished_products_are_dropped_before_total() {
    let platter = common::setup().await;
    platter.carts().add_item("alice", "p-x", 2).await.unwrap();
    platter.carts().add_item("alice", "p-y", 1).await.unwrap();

    platter.db().catalog().delete_product("p-y").await.unwrap();

    let order = platter
        .orders()
        .place_order("alice", &common::pickup())
        .await
        .unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.total_cents, 1000);
}

#[tokio::test]
async fn test_all_products_vanished_is_empty_cart() {
    let platter = common::setup().await;
    platter.carts().add_item("alice", "p-x", 2).await.unwrap();
    platter.db().catalog().delete_product("p-x").await.unwrap();

    let err = platter
        .orders()
        .place_order("alice", &common::pickup())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCart);
}

#[tokio::test]
async fn test_non_admin_sees_only_own_orders() {
    let platter = common::setup().await;
    let carts = platter.carts();
    let orders = platter.orders();

    for (user, product) in [("alice", "p-x"), ("bob", "p-z"), ("alice", "p-y")] {
        carts.add_item(user, product, 1).await.unwrap();
        orders.place_order(user, &common::pickup()).await.unwrap();
    }

    let mine = orders.get_orders(&common::customer("alice")).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|o| o.user_id == "alice"));

    let bobs = orders.get_orders(&common::customer("bob")).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].user_id, "bob");

    let nobody = orders.get_orders(&common::customer("carol")).await.unwrap();
    assert!(nobody.is_empty());

    let all = orders.get_orders(&common::admin()).await.unwrap();
    assert_eq!(all.len(), 3);
    // Newest first.
    assert_eq!(all[0].user_id, "alice");
    assert_eq!(all[0].items[0].product_id, "p-y");
    assert_eq!(all[2].items[0].product_id, "p-x");
}

#[tokio::test]
async fn test_orders_are_populated_for_display() {
    let platter = common::setup().await;
    platter.carts().add_item("bob", "p-z", 2).await.unwrap();
    platter
        .carts()
        .set_note("bob", "p-z", "well done")
        .await
        .unwrap();
    platter
        .orders()
        .place_order("bob", &common::pickup())
        .await
        .unwrap();

    let all = platter.orders().get_orders(&common::admin()).await.unwrap();
    let line = &all[0].items[0];
    let product = line.product.as_ref().unwrap();
    assert_eq!(product.restaurant.as_ref().unwrap().name, "Pizza Corner");
    assert_eq!(product.category.as_ref().unwrap().id, "c-1");
    assert_eq!(line.note, "well done");
    assert_eq!(all[0].user.as_ref().unwrap().email, "bob@example.com");
}

#[tokio::test]
async fn test_ordered_product_cannot_be_deleted() {
    let platter = common::setup().await;
    platter.carts().add_item("alice", "p-x", 1).await.unwrap();
    platter
        .orders()
        .place_order("alice", &common::pickup())
        .await
        .unwrap();

    let err = platter.db().catalog().delete_product("p-x").await.unwrap_err();
    assert!(matches!(err, platter_db::DbError::Conflict { .. }));
}

#[tokio::test]
async fn test_checkout_waits_for_cart_edits() {
    let platter = common::setup().await;
    platter.carts().add_item("alice", "p-x", 1).await.unwrap();

    let adds: Vec<_> = (0..5)
        .map(|_| {
            let carts = platter.carts();
            tokio::spawn(async move { carts.add_item("alice", "p-x", 1).await })
        })
        .collect();
    let checkout = {
        let orders = platter.orders();
        tokio::spawn(async move { orders.place_order("alice", &common::pickup()).await })
    };

    for add in adds {
        add.await.unwrap().unwrap();
    }
    let order = checkout.await.unwrap().unwrap();

    // Whatever the interleaving, every unit is either on the order or
    // still in the cart.
    let left = platter.carts().get_cart("alice").await.unwrap();
    let left_qty: i64 = left.items.iter().map(|i| i.quantity).sum();
    assert_eq!(order.items[0].quantity + left_qty, 6);
}

#[tokio::test]
async fn test_store_failure_before_commit_leaves_no_order() {
    let platter = common::setup().await;
    platter.carts().add_item("alice", "p-x", 2).await.unwrap();

    sqlx::query("ALTER TABLE users RENAME TO users_offline")
        .execute(platter.db().pool())
        .await
        .unwrap();

    let err = platter
        .orders()
        .place_order("alice", &common::pickup())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    assert_eq!(platter.db().orders().count().await.unwrap(), 0);
    assert!(platter.db().carts().load("alice").await.unwrap().is_some());

    // Once the store recovers the same cart checks out.
    sqlx::query("ALTER TABLE users_offline RENAME TO users")
        .execute(platter.db().pool())
        .await
        .unwrap();

    let order = platter
        .orders()
        .place_order("alice", &common::pickup())
        .await
        .unwrap();
    assert_eq!(order.total_cents, 1000);
    assert_eq!(platter.db().orders().count().await.unwrap(), 1);
}
