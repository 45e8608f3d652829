//! Order placement, status transitions and cancellation against SQLite

mod common;

use common::{admin, attach, chef, customer, setup};
use kitchen_server::db::repository::catalog;
use kitchen_server::db::repository::order::{OrderFilter, StatusFilter};
use kitchen_server::orders::modifiers::{GroupSelection, IngredientSelection};
use kitchen_server::orders::{CreateOrderRequest, LineRequest, OrderError};
use serde_json::json;
use shared::models::{FoodChoiceGroup, IngredientType, PackageItem};
use shared::order::{Modifier, ModifierValue, OrderLine, OrderStatus, OrderType};

#[tokio::test]
async fn reservation_matches_expanded_demand() {
    let env = setup().await;
    let burger = env.food("Burger", Some(10)).await;
    let fries = env.food("Fries", Some(5)).await;
    let water = env.food("Water", None).await;
    let menu = env.package("Menu", &[(burger.id, 1), (fries.id, 2)]).await;

    let order = env
        .orders()
        .create(
            &customer(7),
            CreateOrderRequest::new(vec![
                LineRequest::food(burger.id, 2),
                LineRequest::package(menu.id, 2),
                LineRequest::food(water.id, 3),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Placed);
    assert_eq!(order.customer_id, 7);
    assert!(order.stock_committed);
    assert_eq!(order.items.len(), 3);

    // burger: 2 direct + 2 from packages; fries: 2 x 2
    assert_eq!(env.stock(burger.id).await, Some(6));
    assert_eq!(env.stock(fries.id).await, Some(1));
    assert_eq!(env.stock(water.id).await, None);
}

#[tokio::test]
async fn package_line_snapshots_contents() {
    let env = setup().await;
    let a = env.food("A", Some(2)).await;
    let bundle = env.package("Bundle", &[(a.id, 1)]).await;

    let order = env
        .orders()
        .create(
            &customer(3),
            CreateOrderRequest::new(vec![LineRequest::package(bundle.id, 2)]),
        )
        .await
        .unwrap();

    assert_eq!(env.stock(a.id).await, Some(0));
    match &order.items[0] {
        OrderLine::Package {
            package_id,
            qty,
            name,
            items,
            ..
        } => {
            assert_eq!(*package_id, bundle.id);
            assert_eq!(*qty, 2);
            assert_eq!(name, "Bundle");
            assert_eq!(items, &vec![PackageItem { food_id: a.id, qty: 1 }]);
        }
        other => panic!("expected package line, got {other:?}"),
    }
}

#[tokio::test]
async fn shortage_rejects_whole_order() {
    let env = setup().await;
    let a = env.food("A", Some(3)).await;
    let b = env.food("B", Some(1)).await;

    let err = env
        .orders()
        .create(
            &customer(3),
            CreateOrderRequest::new(vec![LineRequest::food(a.id, 2), LineRequest::food(b.id, 2)]),
        )
        .await
        .unwrap_err();

    match err {
        OrderError::InsufficientStock {
            food_id,
            requested,
            available,
            ..
        } => {
            assert_eq!(food_id, b.id);
            assert_eq!(requested, 2);
            assert_eq!(available, 1);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    // The decrement of A rolled back with the transaction
    assert_eq!(env.stock(a.id).await, Some(3));
    assert_eq!(env.stock(b.id).await, Some(1));
    assert!(env.notifier.events().is_empty());
}

#[tokio::test]
async fn unavailable_items_rejected() {
    let env = setup().await;
    let a = env.food("A", Some(3)).await;
    let b = env.food("B", None).await;
    let combo = env.package("Combo", &[(b.id, 1)]).await;

    catalog::set_food_active(&env.pool, a.id, true, false).await.unwrap();
    let err = env
        .orders()
        .create(&customer(3), CreateOrderRequest::new(vec![LineRequest::food(a.id, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ItemUnavailable { kind: "Food", .. }), "{err:?}");

    catalog::set_package_active(&env.pool, combo.id, false).await.unwrap();
    let err = env
        .orders()
        .create(&customer(3), CreateOrderRequest::new(vec![LineRequest::package(combo.id, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ItemUnavailable { kind: "Package", .. }), "{err:?}");

    let err = env
        .orders()
        .create(&customer(3), CreateOrderRequest::new(vec![LineRequest::food(9999, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::FoodNotFound(9999)), "{err:?}");
    assert_eq!(env.stock(a.id).await, Some(3));
}

#[tokio::test]
async fn individual_order_accepts_package_line() {
    let env = setup().await;
    let a = env.food("A", None).await;
    let box_ = env.package("Box", &[(a.id, 1)]).await;

    let mut req = CreateOrderRequest::new(vec![LineRequest::package(box_.id, 1)]);
    req.order_type = OrderType::Individual;
    req.group_key = Some("ignored".into());
    let order = env.orders().create(&customer(4), req).await.unwrap();

    assert_eq!(order.order_type, OrderType::Individual);
    assert_eq!(order.group_key, None);
}

#[tokio::test]
async fn group_order_keeps_trimmed_key_and_notes() {
    let env = setup().await;
    let a = env.food("A", None).await;

    let mut req = CreateOrderRequest::new(vec![LineRequest::food(a.id, 1)]);
    req.order_type = OrderType::Group;
    req.group_key = Some("  table-9 ".into());
    req.notes = "  no rush ".into();
    let order = env.orders().create(&admin(), req).await.unwrap();

    assert_eq!(order.group_key.as_deref(), Some("table-9"));
    assert_eq!(order.notes, "no rush");
    assert_eq!(order.customer_id, admin().id);
}

#[tokio::test]
async fn boolean_modifier_rejects_strings() {
    let env = setup().await;
    let onion = env.ingredient("Onion", IngredientType::Boolean).await;
    let sugar = env.ingredient("Sugar", IngredientType::Percent).await;
    let burger = env
        .food_with(
            "Burger",
            None,
            vec![attach(onion.id, true, true), attach(sugar.id, false, true)],
            Vec::new(),
        )
        .await;

    let mut line = LineRequest::food(burger.id, 1);
    line.ingredients = vec![
        IngredientSelection {
            ingredient_id: onion.id,
            value: json!("yes"),
        },
        IngredientSelection {
            ingredient_id: sugar.id,
            value: json!(250),
        },
    ];
    let order = env
        .orders()
        .create(&customer(5), CreateOrderRequest::new(vec![line]))
        .await
        .unwrap();

    assert_eq!(
        order.items[0].modifiers(),
        &[Modifier::Ingredient {
            ingredient_id: sugar.id,
            ingredient_type: IngredientType::Percent,
            value: ModifierValue::Percent(100.0),
        }]
    );

    let mut line = LineRequest::food(burger.id, 1);
    line.ingredients = vec![IngredientSelection {
        ingredient_id: onion.id,
        value: json!(false),
    }];
    let order = env
        .orders()
        .create(&customer(5), CreateOrderRequest::new(vec![line]))
        .await
        .unwrap();
    assert_eq!(
        order.items[0].modifiers(),
        &[Modifier::Ingredient {
            ingredient_id: onion.id,
            ingredient_type: IngredientType::Boolean,
            value: ModifierValue::Bool(false),
        }]
    );
}

#[tokio::test]
async fn required_group_falls_back_to_food_default() {
    let env = setup().await;
    let milk = env.choice_group("milk", &["whole", "oat", "none"]).await;
    let coffee = env
        .food_with(
            "Coffee",
            None,
            Vec::new(),
            vec![FoodChoiceGroup {
                group_id: milk.id,
                default_choice: Some("oat".into()),
            }],
        )
        .await;

    let order = env
        .orders()
        .create(
            &customer(5),
            CreateOrderRequest::new(vec![LineRequest::food(coffee.id, 1)]),
        )
        .await
        .unwrap();
    assert_eq!(
        order.items[0].modifiers(),
        &[Modifier::Group {
            group_id: milk.id,
            choice: "oat".into(),
        }]
    );

    let mut line = LineRequest::food(coffee.id, 1);
    line.choice_groups = vec![
        GroupSelection {
            group_id: milk.id,
            choice: json!("soy"),
        },
        GroupSelection {
            group_id: milk.id,
            choice: json!("none"),
        },
    ];
    let order = env
        .orders()
        .create(&customer(5), CreateOrderRequest::new(vec![line]))
        .await
        .unwrap();
    assert_eq!(
        order.items[0].modifiers(),
        &[Modifier::Group {
            group_id: milk.id,
            choice: "none".into(),
        }]
    );
}

#[tokio::test]
async fn full_lifecycle_publishes_every_step() {
    let env = setup().await;
    let a = env.food("A", Some(4)).await;
    let placed = env
        .orders()
        .create(&customer(8), CreateOrderRequest::new(vec![LineRequest::food(a.id, 1)]))
        .await
        .unwrap();

    let accepted = env.orders().accept(&chef(), placed.id).await.unwrap();
    assert_eq!(accepted.status, OrderStatus::Accepted);
    assert!(accepted.accepted_at.is_some());
    assert_eq!(accepted.updated_by, Some(chef().id));

    let cooking = env.orders().start(&chef(), placed.id).await.unwrap();
    assert_eq!(cooking.status, OrderStatus::Cooking);
    let ready = env.orders().ready(&admin(), placed.id).await.unwrap();
    assert_eq!(ready.status, OrderStatus::Ready);

    // The owning customer may confirm delivery
    let delivered = env.orders().deliver(&customer(8), placed.id).await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.delivered_at >= delivered.ready_at);
    assert!(delivered.ready_at >= delivered.cooking_at);
    assert!(delivered.cooking_at >= delivered.accepted_at);
    assert!(delivered.stock_committed);
    assert_eq!(env.stock(a.id).await, Some(3));

    let events = env.notifier.events();
    let names: Vec<_> = events.iter().map(|e| e.event_type.event_name()).collect();
    assert_eq!(
        names,
        vec!["order:new", "order:status", "order:status", "order:status", "order:status"]
    );
    assert_eq!(events[4].previous_status, Some(OrderStatus::Ready));
    assert_eq!(events[4].order.status, OrderStatus::Delivered);

    let err = env.orders().cancel(&admin(), placed.id).await.unwrap_err();
    assert!(
        matches!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Delivered,
                ..
            }
        ),
        "{err:?}"
    );
}

#[tokio::test]
async fn deliver_before_ready_rejected_for_every_role() {
    let env = setup().await;
    let a = env.food("A", None).await;
    let order = env
        .orders()
        .create(&customer(8), CreateOrderRequest::new(vec![LineRequest::food(a.id, 1)]))
        .await
        .unwrap();

    for user in [admin(), chef(), customer(8)] {
        let err = env.orders().deliver(&user, order.id).await.unwrap_err();
        assert!(
            matches!(
                err,
                OrderError::InvalidTransition {
                    action: "deliver",
                    from: OrderStatus::Placed
                }
            ),
            "{err:?}"
        );
    }

    env.orders().accept(&chef(), order.id).await.unwrap();
    let err = env.orders().deliver(&admin(), order.id).await.unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }));

    let current = env.orders().get(&admin(), order.id).await.unwrap();
    assert_eq!(current.status, OrderStatus::Accepted);
}

#[tokio::test]
async fn cancel_restores_stock_once() {
    let env = setup().await;
    let a = env.food("A", Some(5)).await;
    let b = env.food("B", Some(2)).await;
    let pack = env.package("Pack", &[(a.id, 2), (b.id, 1)]).await;

    let order = env
        .orders()
        .create(
            &customer(6),
            CreateOrderRequest::new(vec![LineRequest::package(pack.id, 2), LineRequest::food(a.id, 1)]),
        )
        .await
        .unwrap();
    assert_eq!(env.stock(a.id).await, Some(0));
    assert_eq!(env.stock(b.id).await, Some(0));

    env.orders().accept(&chef(), order.id).await.unwrap();
    let canceled = env.orders().cancel(&chef(), order.id).await.unwrap();
    assert_eq!(canceled.status, OrderStatus::Canceled);
    assert!(canceled.canceled_at.is_some());
    assert!(!canceled.stock_committed);
    assert_eq!(env.stock(a.id).await, Some(5));
    assert_eq!(env.stock(b.id).await, Some(2));

    let err = env.orders().cancel(&admin(), order.id).await.unwrap_err();
    assert!(
        matches!(
            err,
            OrderError::InvalidTransition {
                action: "cancel",
                from: OrderStatus::Canceled
            }
        ),
        "{err:?}"
    );
    assert_eq!(env.stock(a.id).await, Some(5));
    assert_eq!(env.stock(b.id).await, Some(2));
}

#[tokio::test]
async fn cancel_uses_snapshot_after_menu_edit() {
    let env = setup().await;
    let a = env.food("A", Some(4)).await;
    let b = env.food("B", Some(4)).await;
    let pack = env.package("Pack", &[(a.id, 1)]).await;

    let order = env
        .orders()
        .create(&customer(6), CreateOrderRequest::new(vec![LineRequest::package(pack.id, 2)]))
        .await
        .unwrap();
    assert_eq!(env.stock(a.id).await, Some(2));

    // Package now points at B; the order still owes A
    sqlx::query("UPDATE package_items SET food_id = ?1 WHERE package_id = ?2")
        .bind(b.id)
        .bind(pack.id)
        .execute(&env.pool)
        .await
        .unwrap();

    env.orders().cancel(&admin(), order.id).await.unwrap();
    assert_eq!(env.stock(a.id).await, Some(4));
    assert_eq!(env.stock(b.id).await, Some(4));
}

#[tokio::test]
async fn role_gates() {
    let env = setup().await;
    let a = env.food("A", None).await;

    let err = env
        .orders()
        .create(&chef(), CreateOrderRequest::new(vec![LineRequest::food(a.id, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Forbidden(_)));

    let mut req = CreateOrderRequest::new(vec![LineRequest::food(a.id, 1)]);
    req.customer_id = Some(99);
    let err = env.orders().create(&customer(5), req).await.unwrap_err();
    assert!(matches!(err, OrderError::Forbidden(_)));

    let order = env
        .orders()
        .create(&customer(5), CreateOrderRequest::new(vec![LineRequest::food(a.id, 1)]))
        .await
        .unwrap();

    for result in [
        env.orders().accept(&customer(5), order.id).await,
        env.orders().cancel(&customer(5), order.id).await,
        env.orders().deliver(&customer(6), order.id).await,
        env.orders().get(&customer(6), order.id).await,
    ] {
        assert!(matches!(result, Err(OrderError::Forbidden(_))), "{result:?}");
    }

    let err = env.orders().accept(&chef(), 424242).await.unwrap_err();
    assert!(matches!(err, OrderError::OrderNotFound(424242)));
}

#[tokio::test]
async fn listing_scopes_and_filters() {
    let env = setup().await;
    let salad = env.food("Caesar Salad", None).await;
    let soup = env.food("Soup", None).await;

    let mine = env
        .orders()
        .create(&customer(1), CreateOrderRequest::new(vec![LineRequest::food(salad.id, 1)]))
        .await
        .unwrap();
    let theirs = env
        .orders()
        .create(&customer(2), CreateOrderRequest::new(vec![LineRequest::food(soup.id, 1)]))
        .await
        .unwrap();
    env.orders().cancel(&chef(), theirs.id).await.unwrap();

    let all = env.orders().list(&chef(), OrderFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let own = env
        .orders()
        .list(&customer(1), OrderFilter::default())
        .await
        .unwrap();
    assert_eq!(own.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mine.id]);

    let active = env
        .orders()
        .list(
            &admin(),
            OrderFilter {
                status: Some(StatusFilter::Active),
                ..OrderFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(active.iter().map(|o| o.id).collect::<Vec<_>>(), vec![mine.id]);

    let by_name = env
        .orders()
        .list(
            &admin(),
            OrderFilter {
                q: Some("caesar".into()),
                ..OrderFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, mine.id);
}

#[tokio::test]
async fn search_folds_ascii_case_around_accents() {
    let env = setup().await;
    let eclair = env.food("Éclair Café", None).await;
    let order = env
        .orders()
        .create(&customer(1), CreateOrderRequest::new(vec![LineRequest::food(eclair.id, 1)]))
        .await
        .unwrap();

    for q in ["ÉCLAIR", "cAFé", "éclair CAF"] {
        let found = env
            .orders()
            .list(
                &admin(),
                OrderFilter {
                    q: Some(q.into()),
                    ..OrderFilter::default()
                },
            )
            .await
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|o| o.id).collect();
        let expected = if q.starts_with('é') { vec![] } else { vec![order.id] };
        assert_eq!(ids, expected, "q = {q}");
    }
}
