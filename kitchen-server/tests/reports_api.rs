//! Admin summary report over HTTP

mod common;

use common::{admin, call, chef, customer, setup};
use http::StatusCode;
use kitchen_server::api::build_app;
use kitchen_server::orders::{CreateOrderRequest, LineRequest};

#[tokio::test]
async fn admin_summary_aggregates_orders_and_menu() {
    let env = setup().await;
    let app = build_app(env.state.clone());
    let burger = env.food("Burger", Some(5)).await;
    let water = env.food("Water", None).await;
    let _fries = env.food("Fries", Some(0)).await;
    let menu = env.package("Menu", &[(burger.id, 1)]).await;

    let placed = env
        .orders()
        .create(
            &customer(1),
            CreateOrderRequest::new(vec![
                LineRequest::food(burger.id, 2),
                LineRequest::package(menu.id, 1),
            ]),
        )
        .await
        .unwrap();
    let delivered = env
        .orders()
        .create(&customer(2), CreateOrderRequest::new(vec![LineRequest::food(water.id, 4)]))
        .await
        .unwrap();
    let chef = chef();
    env.orders().accept(&chef, delivered.id).await.unwrap();
    env.orders().start(&chef, delivered.id).await.unwrap();
    env.orders().ready(&chef, delivered.id).await.unwrap();
    env.orders().deliver(&chef, delivered.id).await.unwrap();
    let canceled = env
        .orders()
        .create(&customer(1), CreateOrderRequest::new(vec![LineRequest::food(burger.id, 1)]))
        .await
        .unwrap();
    env.orders().cancel(&chef, canceled.id).await.unwrap();

    let token = env.token(&admin());
    let (status, body) = call(&app, "GET", "/api/reports/admin/summary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let data = &body["data"];

    assert_eq!(data["meta"]["days"], 14);
    let orders = &data["cards"]["orders"];
    assert_eq!(orders["total"], 3);
    assert_eq!(orders["active"], 1);
    assert_eq!(orders["delivered"], 1);
    assert_eq!(orders["canceled"], 1);
    assert_eq!(data["cards"]["today"]["total"], 3);
    assert_eq!(data["cards"]["today"]["delivered"], 1);
    assert_eq!(data["cards"]["today"]["canceled"], 1);

    // Fries are sold out; the package is enabled
    assert_eq!(data["cards"]["menu"]["foods"]["total"], 3);
    assert_eq!(data["cards"]["menu"]["foods"]["active"], 2);
    assert_eq!(data["cards"]["menu"]["packages"]["active"], 1);

    let by_status = data["distributions"]["byStatus"].as_array().unwrap();
    assert_eq!(by_status.len(), 3);
    assert!(by_status.iter().all(|s| s["count"] == 1));
    assert_eq!(data["distributions"]["byType"][0]["type"], "INDIVIDUAL");
    assert_eq!(data["distributions"]["byType"][0]["count"], 3);

    let series = data["series"].as_array().unwrap();
    assert_eq!(series.len(), 14);
    assert_eq!(series[13]["count"], 3);
    assert_eq!(series.iter().map(|d| d["count"].as_i64().unwrap()).sum::<i64>(), 3);

    // FOOD lines only: 4 waters, then 2 + 1 burgers (the package line is not counted)
    let top_foods = data["topFoods"].as_array().unwrap();
    assert_eq!(top_foods.len(), 2);
    assert_eq!(top_foods[0]["id"], water.id);
    assert_eq!(top_foods[0]["qty"], 4);
    assert_eq!(top_foods[1]["name"], "Burger");
    assert_eq!(top_foods[1]["qty"], 3);
    assert_eq!(data["topPackages"][0]["name"], "Menu");
    assert_eq!(data["topPackages"][0]["qty"], 1);

    let recent = data["recentOrders"].as_array().unwrap();
    let mut ids: Vec<i64> = recent.iter().map(|o| o["id"].as_i64().unwrap()).collect();
    let created: Vec<i64> = recent.iter().map(|o| o["createdAt"].as_i64().unwrap()).collect();
    assert!(created.windows(2).all(|w| w[0] >= w[1]), "{created:?}");
    ids.sort_unstable();
    let mut expected = vec![placed.id, delivered.id, canceled.id];
    expected.sort_unstable();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn admin_summary_window_and_access() {
    let env = setup().await;
    let app = build_app(env.state.clone());
    let admin_token = env.token(&admin());

    let (status, body) = call(
        &app,
        "GET",
        "/api/reports/admin/summary?days=7",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["series"].as_array().map(Vec::len), Some(7));
    assert_eq!(body["data"]["cards"]["orders"]["total"], 0);

    for days in ["0", "181", "abc"] {
        let uri = format!("/api/reports/admin/summary?days={days}");
        let (status, body) = call(&app, "GET", &uri, Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={days}: {body}");
    }

    for user in [chef(), customer(3)] {
        let token = env.token(&user);
        let (status, _) = call(&app, "GET", "/api/reports/admin/summary", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, _) = call(&app, "GET", "/api/reports/admin/summary", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
