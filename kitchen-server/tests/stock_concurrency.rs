//! Concurrent reservations never oversell

mod common;

use std::sync::Arc;

use common::{admin, chef, customer, setup};
use kitchen_server::orders::{CreateOrderRequest, LineRequest, OrderError};
use shared::order::OrderStatus;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_unit_goes_to_exactly_one_order() {
    let env = setup().await;
    let cake = env.food("Cake", Some(1)).await;
    let orders = Arc::clone(&env.state.orders);
    let cake_id = cake.id;

    let mut handles = Vec::new();
    for customer_id in [10, 11] {
        let orders = Arc::clone(&orders);
        handles.push(tokio::spawn(async move {
            orders
                .create(
                    &customer(customer_id),
                    CreateOrderRequest::new(vec![LineRequest::food(cake_id, 1)]),
                )
                .await
        }));
    }

    let mut placed = 0;
    let mut short = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(OrderError::InsufficientStock { available, .. }) => {
                assert_eq!(available, 0);
                short += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!((placed, short), (1, 1));
    assert_eq!(env.stock(cake.id).await, Some(0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_orders_and_cancels_balance_out() {
    let env = setup().await;
    let soup = env.food("Soup", Some(50)).await;
    let bread = env.food("Bread", Some(50)).await;
    let meal = env.package("Meal", &[(soup.id, 1), (bread.id, 1)]).await;
    let orders = Arc::clone(&env.state.orders);
    let (meal_id, soup_id) = (meal.id, soup.id);

    let mut handles = Vec::new();
    for i in 0..20_i64 {
        let orders = Arc::clone(&orders);
        handles.push(tokio::spawn(async move {
            let order = orders
                .create(
                    &customer(100 + i),
                    CreateOrderRequest::new(vec![
                        LineRequest::package(meal_id, 1),
                        LineRequest::food(soup_id, 1),
                    ]),
                )
                .await?;
            if i % 2 == 0 {
                orders.cancel(&chef(), order.id).await?;
            }
            Ok::<_, OrderError>(())
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // 10 orders kept, each holding 2 soup and 1 bread
    assert_eq!(env.stock(soup.id).await, Some(30));
    assert_eq!(env.stock(bread.id).await, Some(40));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn start_wins_when_accept_lands_first() {
    let env = setup().await;
    let tea = env.food("Tea", None).await;
    let orders = Arc::clone(&env.state.orders);

    let mut ids = Vec::new();
    for i in 0..40_i64 {
        let order = orders
            .create(
                &customer(200 + i),
                CreateOrderRequest::new(vec![LineRequest::food(tea.id, 1)]),
            )
            .await
            .unwrap();
        ids.push(order.id);
    }

    let mut handles = Vec::new();
    for &order_id in &ids {
        let accept_orders = Arc::clone(&orders);
        let start_orders = Arc::clone(&orders);
        let accept = tokio::spawn(async move { accept_orders.accept(&chef(), order_id).await });
        let start = tokio::spawn(async move { start_orders.start(&admin(), order_id).await });
        handles.push((order_id, accept, start));
    }

    for (order_id, accept, start) in handles {
        let started = start.await.unwrap().unwrap_or_else(|e| {
            panic!("start on order {order_id} rejected: {e}");
        });
        assert_eq!(started.status, OrderStatus::Cooking);

        // accept either landed first or found the order already cooking
        match accept.await.unwrap() {
            Ok(_) => {}
            Err(OrderError::InvalidTransition { from, .. }) => {
                assert_eq!(from, OrderStatus::Cooking)
            }
            Err(other) => panic!("unexpected accept error: {other:?}"),
        }

        let stored = env.orders().get(&admin(), order_id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Cooking);
        assert!(stored.cooking_at.is_some());
    }
}
