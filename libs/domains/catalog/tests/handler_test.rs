//! Handler tests for the catalog domain
//!
//! These tests drive the HTTP handlers against the in-memory store:
//! request deserialization, response serialization, status codes and
//! error responses. They cover the domain routers only, not the full
//! application with documentation routes and middleware.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_catalog::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()

fn test_app() -> Router {
    let store = Arc::new(InMemoryCatalog::new());

    Router::new()
        .nest(
            "/categories",
            handlers::categories_router(CategoryService::new(store.clone(), store.clone())),
        )
        .nest(
            "/brands",
            handlers::brands_router(BrandService::new(store.clone(), store.clone())),
        )
        .nest(
            "/products",
            handlers::products_router(ProductService::new(
                store.clone(),
                store.clone(),
                store.clone(),
            )),
        )
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn create_category(app: &Router, name: &str, parent_id: Option<&str>) -> Category {
    let mut payload = json!({ "name": name });
    if let Some(parent_id) = parent_id {
        payload["parent_id"] = json!(parent_id);
    }
    let response = send(app, "POST", "/categories", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn create_brand(app: &Router, name: &str) -> Brand {
    let response = send(app, "POST", "/brands", Some(json!({ "name": name }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

async fn create_product(app: &Router, payload: Value) -> Product {
    let response = send(app, "POST", "/products", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

fn product_payload(name: &str, sku: &str, category: &Category, brand: &Brand) -> Value {
    json!({
        "name": name,
        "sku": sku,
        "category_id": category.id,
        "brand_id": brand.id,
        "price_cents": 10_000,
        "stock_quantity": 5
    })
}

#[tokio::test]
async fn test_create_category_returns_201() {
    let app = test_app();
    let category = create_category(&app, "Components", None).await;
    assert_eq!(category.name, "Components");
    assert!(category.is_active);
}

#[tokio::test]
async fn test_duplicate_category_name_returns_409() {
    let app = test_app();
    create_category(&app, "Components", None).await;

    let response = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "name": "components" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_category_validates_input() {
    let app = test_app();
    let response = send(&app, "POST", "/categories", Some(json!({ "name": "" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_uuid_path_returns_400() {
    let app = test_app();
    let response = send(&app, "GET", "/categories/not-a-uuid", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_category_returns_404_for_missing() {
    let app = test_app();
    let response = send(
        &app,
        "GET",
        &format!("/categories/{}", uuid::Uuid::now_v7()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_tree_nests_children() {
    let app = test_app();
    let root = create_category(&app, "Components", None).await;
    let child = create_category(&app, "CPUs", Some(&root.id.to_string())).await;
    create_category(&app, "Peripherals", None).await;

    let response = send(&app, "GET", "/categories/tree", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let tree: Value = json_body(response.into_body()).await;
    let nodes = tree.as_array().unwrap();
    assert_eq!(nodes.len(), 2);

    let components = nodes
        .iter()
        .find(|n| n["category"]["name"] == "Components")
        .unwrap();
    assert_eq!(
        components["children"][0]["category"]["id"],
        json!(child.id)
    );
}

#[tokio::test]
async fn test_subcategories_endpoint_lists_direct_children() {
    let app = test_app();
    let root = create_category(&app, "Components", None).await;
    create_category(&app, "CPUs", Some(&root.id.to_string())).await;
    create_category(&app, "GPUs", Some(&root.id.to_string())).await;

    let response = send(
        &app,
        "GET",
        &format!("/categories/{}/subcategories", root.id),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let children: Vec<Category> = json_body(response.into_body()).await;
    assert_eq!(children.len(), 2);
}

#[tokio::test]
async fn test_update_category_rejects_self_parent_with_409() {
    let app = test_app();
    let category = create_category(&app, "Components", None).await;

    let response = send(
        &app,
        "PUT",
        &format!("/categories/{}", category.id),
        Some(json!({ "parent_id": category.id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_category_rejects_cycle_with_409() {
    let app = test_app();
    let cpus = create_category(&app, "CPUs", None).await;
    let gaming = create_category(&app, "Gaming CPUs", Some(&cpus.id.to_string())).await;

    // Moving CPUs under its own child closes a cycle
    let response = send(
        &app,
        "PUT",
        &format!("/categories/{}", cpus.id),
        Some(json!({ "parent_id": gaming.id })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_category_unknown_parent_returns_422() {
    let app = test_app();
    let category = create_category(&app, "Components", None).await;

    let response = send(
        &app,
        "PUT",
        &format!("/categories/{}", category.id),
        Some(json!({ "parent_id": uuid::Uuid::now_v7() })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_category_blocked_until_children_removed() {
    let app = test_app();
    let root = create_category(&app, "Components", None).await;
    let child = create_category(&app, "CPUs", Some(&root.id.to_string())).await;

    let response = send(&app, "DELETE", &format!("/categories/{}", root.id), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(&app, "DELETE", &format!("/categories/{}", child.id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "DELETE", &format!("/categories/{}", root.id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_brand_blocked_by_products() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    let response = send(&app, "DELETE", &format!("/brands/{}", brand.id), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_product_with_unknown_category_returns_422() {
    let app = test_app();
    let brand = create_brand(&app, "Initech").await;

    let response = send(
        &app,
        "POST",
        "/products",
        Some(json!({
            "name": "Model K",
            "sku": "KB-001",
            "category_id": uuid::Uuid::now_v7(),
            "brand_id": brand.id,
            "price_cents": 10_000
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_discount_must_be_strictly_below_price() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;

    let mut payload = product_payload("Model K", "KB-001", &category, &brand);
    payload["price_cents"] = json!(100);
    payload["discount_price_cents"] = json!(100);
    let response = send(&app, "POST", "/products", Some(payload.clone())).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    payload["discount_price_cents"] = json!(99);
    let response = send(&app, "POST", "/products", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_sku_returns_409() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    let response = send(
        &app,
        "POST",
        "/products",
        Some(product_payload("Model L", "kb-001", &category, &brand)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_get_product_by_sku() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    let created =
        create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    let response = send(&app, "GET", "/products/sku/kb-001", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.id, created.id);

    let response = send(&app, "GET", "/products/sku/KB-404", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_products_filters_and_sorts() {
    let app = test_app();
    let keyboards = create_category(&app, "Keyboards", None).await;
    let mice = create_category(&app, "Mice", None).await;
    let brand = create_brand(&app, "Initech").await;

    let mut cheap = product_payload("Budget Board", "KB-001", &keyboards, &brand);
    cheap["price_cents"] = json!(4_000);
    create_product(&app, cheap).await;

    let mut pricey = product_payload("Pro Board", "KB-002", &keyboards, &brand);
    pricey["price_cents"] = json!(15_000);
    create_product(&app, pricey).await;

    let mut sold_out = product_payload("Rare Board", "KB-003", &keyboards, &brand);
    sold_out["stock_quantity"] = json!(0);
    create_product(&app, sold_out).await;

    create_product(&app, product_payload("Mouse", "MS-001", &mice, &brand)).await;

    let uri = format!(
        "/products?category_id={}&in_stock=true&sort_by=price&sort_order=desc",
        keyboards.id
    );
    let response = send(&app, "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page["total"], json!(2));
    let names: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Pro Board", "Budget Board"]);
}

#[tokio::test]
async fn test_out_of_range_page_returns_empty_items_with_total() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    for i in 0..3 {
        create_product(
            &app,
            product_payload(&format!("Board {i}"), &format!("KB-{i:03}"), &category, &brand),
        )
        .await;
    }

    let response = send(&app, "GET", "/products?page=50&page_size=2", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
    assert_eq!(page["total"], json!(3));
    assert_eq!(page["total_pages"], json!(2));
}

#[tokio::test]
async fn test_stock_adjustment_and_negative_guard() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    let product =
        create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    // 5 on hand; removing 8 must fail
    let response = send(
        &app,
        "POST",
        &format!("/products/{}/stock", product.id),
        Some(json!({ "quantity": -8, "reason": "damaged batch" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send(
        &app,
        "POST",
        &format!("/products/{}/stock", product.id),
        Some(json!({ "quantity": -3, "reason": "damaged batch" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.stock_quantity, 2);
}

#[tokio::test]
async fn test_set_stock_level() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    let product =
        create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    let response = send(
        &app,
        "PUT",
        &format!("/products/{}/stock", product.id),
        Some(json!({ "quantity": 40 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.stock_quantity, 40);

    let response = send(
        &app,
        "PUT",
        &format!("/products/{}/stock", product.id),
        Some(json!({ "quantity": -1 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_product_clears_discount_with_null() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;

    let mut payload = product_payload("Model K", "KB-001", &category, &brand);
    payload["discount_price_cents"] = json!(8_000);
    let product = create_product(&app, payload).await;
    assert_eq!(product.discount_price_cents, Some(8_000));

    let response = send(
        &app,
        "PUT",
        &format!("/products/{}", product.id),
        Some(json!({ "discount_price_cents": null })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.discount_price_cents, None);
}

#[tokio::test]
async fn test_price_filter_matches_list_price_of_discounted_product() {
    let app = test_app();
    let category = create_category(&app, "Monitors", None).await;
    let brand = create_brand(&app, "Initech").await;

    let mut payload = product_payload("4K Monitor", "MN-001", &category, &brand);
    payload["price_cents"] = json!(10_000);
    payload["discount_price_cents"] = json!(8_000);
    create_product(&app, payload).await;

    // min_price above the discount but below the list price still matches
    let response = send(&app, "GET", "/products?min_price=9000", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page["total"], json!(1));

    // max_price at the discount does not
    let response = send(&app, "GET", "/products?max_price=8000", None).await;
    let page: Value = json_body(response.into_body()).await;
    assert_eq!(page["total"], json!(0));
}

#[tokio::test]
async fn test_reviews_endpoint_round_trip() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    let product =
        create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    let response = send(
        &app,
        "POST",
        &format!("/products/{}/reviews", product.id),
        Some(json!({ "customer_name": "Dana", "rating": 5, "title": "Great board" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        &app,
        "POST",
        &format!("/products/{}/reviews", product.id),
        Some(json!({ "customer_name": "Alex", "rating": 4 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "GET", &format!("/products/{}/reviews", product.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reviews: Vec<Review> = json_body(response.into_body()).await;
    assert_eq!(reviews.len(), 2);

    // The product carries the refreshed aggregates
    let response = send(&app, "GET", &format!("/products/{}", product.id), None).await;
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.review_count, 2);
    assert_eq!(updated.average_rating, Some(4.5));
}

#[tokio::test]
async fn test_review_rating_out_of_range_returns_400() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    let product =
        create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    let response = send(
        &app,
        "POST",
        &format!("/products/{}/reviews", product.id),
        Some(json!({ "customer_name": "Dana", "rating": 6 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reviews_for_missing_product_return_404() {
    let app = test_app();
    let response = send(
        &app,
        "GET",
        &format!("/products/{}/reviews", uuid::Uuid::now_v7()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        "POST",
        &format!("/products/{}/reviews", uuid::Uuid::now_v7()),
        Some(json!({ "customer_name": "Dana", "rating": 3 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_returns_204_then_404() {
    let app = test_app();
    let category = create_category(&app, "Keyboards", None).await;
    let brand = create_brand(&app, "Initech").await;
    let product =
        create_product(&app, product_payload("Model K", "KB-001", &category, &brand)).await;

    let response = send(&app, "DELETE", &format!("/products/{}", product.id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &format!("/products/{}", product.id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
