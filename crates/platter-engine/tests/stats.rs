//! Admin dashboard.

mod common;

use platter_core::Role;
use platter_engine::ErrorKind;

async fn order(platter: &platter_engine::Platter, user: &str, product: &str, qty: i64) {
    platter.carts().add_item(user, product, qty).await.unwrap();
    platter
        .orders()
        .place_order(user, &common::pickup())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dashboard_is_admin_only() {
    let platter = common::setup().await;

    let err = platter
        .stats()
        .dashboard(&common::customer("alice"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_orders_by_restaurant_sums_order_totals() {
    let platter = common::setup().await;
    order(&platter, "alice", "p-x", 2).await; // $10.00
    order(&platter, "bob", "p-x", 3).await; // $15.00
    order(&platter, "bob", "p-z", 1).await; // $7.00

    let stats = platter.stats().dashboard(&common::admin()).await.unwrap();

    assert_eq!(stats.orders_by_restaurant.len(), 2);
    let falafel = &stats.orders_by_restaurant[0];
    assert_eq!(falafel.restaurant_id, "r-a");
    assert_eq!(falafel.total_orders, 2);
    assert_eq!(falafel.total_sales_cents, 2500);

    let pizza = &stats.orders_by_restaurant[1];
    assert_eq!(pizza.restaurant_name, "Pizza Corner");
    assert_eq!(pizza.total_orders, 1);
    assert_eq!(pizza.total_sales_cents, 700);
}

#[tokio::test]
async fn test_counts_roles_and_users() {
    let platter = common::setup().await;
    order(&platter, "alice", "p-x", 1).await;
    order(&platter, "bob", "p-y", 1).await;
    order(&platter, "bob", "p-y", 1).await;

    let t0 = chrono::Utc::now();
    let users = platter.db().users();
    users.mark_online("alice", t0).await.unwrap();
    users
        .mark_offline("alice", t0 + chrono::Duration::seconds(120))
        .await
        .unwrap();
    users.mark_online("bob", t0).await.unwrap();

    let stats = platter.stats().dashboard(&common::admin()).await.unwrap();

    assert_eq!(stats.restaurants_count, 2);
    assert_eq!(stats.users_count, 3);

    let roles: Vec<_> = stats.roles.iter().map(|r| (r.role, r.count)).collect();
    assert_eq!(roles, vec![(Role::Admin, 1), (Role::User, 2)]);

    let by_user: Vec<_> = stats
        .orders_by_user
        .iter()
        .map(|u| (u.username.as_str(), u.order_count))
        .collect();
    assert_eq!(by_user, vec![("bob", 2), ("alice", 1)]);

    let alice = stats
        .users_online_stats
        .iter()
        .find(|u| u.user_id == "alice")
        .unwrap();
    assert_eq!(alice.total_online_secs, 120);
    assert!(!alice.is_online);
    let bob = stats
        .users_online_stats
        .iter()
        .find(|u| u.user_id == "bob")
        .unwrap();
    assert!(bob.is_online);
}

#[tokio::test]
async fn test_empty_dashboard() {
    let platter = common::setup().await;
    let stats = platter.stats().dashboard(&common::admin()).await.unwrap();

    assert!(stats.orders_by_restaurant.is_empty());
    assert!(stats.orders_by_user.is_empty());
    assert_eq!(stats.users_online_stats.len(), 3);
}

#[tokio::test]
async fn test_product_of_missing_restaurant_fails_whole_request() {
    let platter = common::setup().await;
    platter
        .db()
        .catalog()
        .insert_product(&common::product("p-orphan", "r-gone", 400))
        .await
        .unwrap();
    order(&platter, "alice", "p-orphan", 1).await;

    let err = platter
        .stats()
        .dashboard(&common::admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AggregationError);
}

#[tokio::test]
async fn test_order_of_missing_user_fails_whole_request() {
    let platter = common::setup().await;
    // Identity comes from the token; the profile may be gone.
    order(&platter, "ghost", "p-x", 1).await;

    let err = platter
        .stats()
        .dashboard(&common::admin())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AggregationError);
}
