//! End-to-end route tests against an in-memory deployment.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

async fn test_app() -> Router {
    let deployment = server::DeploymentImpl::new_in_memory()
        .await
        .expect("in-memory deployment");
    server::app(deployment)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

async fn create_category(app: &Router, name: &str, category_type: &str, parent: Option<&str>) -> String {
    let (status, body) = call(
        app,
        send_json(
            "POST",
            "/api/categories",
            json!({ "name": name, "category_type": category_type, "parent_id": parent }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = call(&app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!("ok"));
}

#[tokio::test]
async fn test_category_tree_nests_and_truncates() {
    let app = test_app().await;

    let brand = create_category(&app, "Apex", "brand", None).await;
    let series = create_category(&app, "Apex One", "series", Some(&brand)).await;
    let _model = create_category(&app, "One Pro", "model", Some(&series)).await;

    let (status, body) = call(&app, get("/api/categories/tree")).await;
    assert_eq!(status, StatusCode::OK);
    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], json!("Apex"));
    assert_eq!(roots[0]["children"][0]["name"], json!("Apex One"));
    assert_eq!(
        roots[0]["children"][0]["children"][0]["name"],
        json!("One Pro")
    );

    // depth=1 keeps the series but cuts the model level off.
    let (_, shallow) = call(&app, get("/api/categories/tree?depth=1")).await;
    let roots = shallow["data"].as_array().unwrap();
    assert_eq!(roots[0]["children"][0]["name"], json!("Apex One"));
    assert_eq!(
        roots[0]["children"][0]["children"].as_array().unwrap().len(),
        0
    );
}

#[tokio::test]
async fn test_category_reorder_changes_tree_order() {
    let app = test_app().await;

    let first = create_category(&app, "Apex", "brand", None).await;
    let second = create_category(&app, "Nova", "brand", None).await;

    let (status, _) = call(
        &app,
        send_json(
            "PUT",
            "/api/categories/reorder",
            json!([
                { "id": second, "sort_order": 0 },
                { "id": first, "sort_order": 1 },
            ]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, get("/api/categories/tree")).await;
    let roots = body["data"].as_array().unwrap();
    assert_eq!(roots[0]["name"], json!("Nova"));
    assert_eq!(roots[1]["name"], json!("Apex"));
}

#[tokio::test]
async fn test_product_listing_filters_by_brand() {
    let app = test_app().await;

    let b1 = create_category(&app, "Apex", "brand", None).await;
    let s1 = create_category(&app, "Apex One", "series", Some(&b1)).await;
    let m1 = create_category(&app, "One Pro", "model", Some(&s1)).await;
    let b2 = create_category(&app, "Nova", "brand", None).await;
    let s2 = create_category(&app, "Nova X", "series", Some(&b2)).await;
    let m2 = create_category(&app, "X Lite", "model", Some(&s2)).await;

    for (name, model) in [("Apex screen", &m1), ("Nova screen", &m2)] {
        let (status, _) = call(
            &app,
            send_json(
                "POST",
                "/api/products",
                json!({ "name": name, "price": 19.5, "model_ids": [model] }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app, get(&format!("/api/products?brand={b1}"))).await;
    assert_eq!(status, StatusCode::OK);
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], json!("Apex screen"));

    // The more specific model selection wins over the brand.
    let (_, body) = call(&app, get(&format!("/api/products?brand={b1}&model={m2}"))).await;
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], json!("Nova screen"));
}

#[tokio::test]
async fn test_cart_and_checkout_flow() {
    let app = test_app().await;
    let session_id = Uuid::new_v4();

    let (_, created) = call(
        &app,
        send_json(
            "POST",
            "/api/products",
            json!({ "name": "Battery", "price": 12.5 }),
        ),
    )
    .await;
    let product_id = created["data"]["id"].as_str().unwrap().to_string();

    // Checkout with an empty cart is rejected.
    let contact = json!({
        "name": "Ada",
        "email": "ada@example.com",
        "phone": "+353 1 234 5678",
        "address": "1 Main St",
    });
    let (status, _) = call(
        &app,
        send_json(
            "POST",
            "/api/orders",
            json!({ "session_id": session_id, "contact_info": contact }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for _ in 0..2 {
        let (status, _) = call(
            &app,
            send_json(
                "POST",
                &format!("/api/cart/{session_id}/items"),
                json!({ "product_id": product_id }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, cart) = call(&app, get(&format!("/api/cart/{session_id}"))).await;
    assert_eq!(cart["data"]["total_quantity"], json!(2));
    assert_eq!(cart["data"]["total_price"], json!(25.0));

    let (status, order) = call(
        &app,
        send_json(
            "POST",
            "/api/orders",
            json!({ "session_id": session_id, "contact_info": contact }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["data"]["status"], json!("pending"));
    assert_eq!(order["data"]["total_price"], json!(25.0));

    // Cart is cleared and the order shows up in the admin listing.
    let (_, cart) = call(&app, get(&format!("/api/cart/{session_id}"))).await;
    assert_eq!(cart["data"]["total_quantity"], json!(0));

    let (_, orders) = call(&app, get("/api/orders")).await;
    assert_eq!(orders["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_unknown_product_to_cart_is_404() {
    let app = test_app().await;
    let session_id = Uuid::new_v4();

    let (status, body) = call(
        &app,
        send_json(
            "POST",
            &format!("/api/cart/{session_id}/items"),
            json!({ "product_id": Uuid::new_v4() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_order_status_update() {
    let app = test_app().await;
    let session_id = Uuid::new_v4();

    let (_, created) = call(
        &app,
        send_json(
            "POST",
            "/api/products",
            json!({ "name": "Screen", "price": 30.0 }),
        ),
    )
    .await;
    let product_id = created["data"]["id"].as_str().unwrap().to_string();
    call(
        &app,
        send_json(
            "POST",
            &format!("/api/cart/{session_id}/items"),
            json!({ "product_id": product_id }),
        ),
    )
    .await;

    let (_, order) = call(
        &app,
        send_json(
            "POST",
            "/api/orders",
            json!({
                "session_id": session_id,
                "contact_info": {
                    "name": "Ada",
                    "email": "ada@example.com",
                    "phone": "1",
                    "address": "1 Main St",
                },
            }),
        ),
    )
    .await;
    let order_id = order["data"]["id"].as_str().unwrap().to_string();

    let (status, updated) = call(
        &app,
        send_json(
            "PUT",
            &format!("/api/orders/{order_id}/status"),
            json!({ "status": "ready" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], json!("ready"));

    let (status, _) = call(
        &app,
        send_json(
            "PUT",
            &format!("/api/orders/{}/status", Uuid::new_v4()),
            json!({ "status": "ready" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_crud() {
    let app = test_app().await;

    let (status, created) = call(
        &app,
        send_json(
            "POST",
            "/api/users",
            json!({ "email": "ada@example.com", "display_name": "Ada" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["data"]["role"], json!("customer"));
    let user_id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, updated) = call(
        &app,
        send_json(
            "PUT",
            &format!("/api/users/{user_id}"),
            json!({
                "email": "ada@example.com",
                "display_name": "Ada",
                "role": "admin",
                "disabled": false,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["role"], json!("admin"));

    let (status, _) = call(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/users/{user_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = call(&app, get("/api/users")).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 0);
}
