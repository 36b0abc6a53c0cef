use std::time::Duration;

use tienda_net::models::{CreateOrderItemRequest, CreateOrderRequest, LoginRequest, RegisterRequest};
use tienda_net::{ExternalCatalog, GatewayError, HttpGateway, RemoteGateway};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "demo@example.com".into(),
        password: "demo123".into(),
    }
}

// --- Auth ---

#[tokio::test]
async fn login_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "demo@example.com",
            "password": "demo123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 17,
            "email": "demo@example.com",
            "name": "Demo User",
            "message": "Login successful"
        })))
        .mount(&server)
        .await;

    let auth = gateway(&server).login(&login_request()).await.unwrap();
    assert_eq!(auth.id, 17);
    assert_eq!(auth.name.as_deref(), Some("Demo User"));
    assert_eq!(auth.message, "Login successful");
}

#[tokio::test]
async fn login_accepts_body_without_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 77,
            "name": "Ana",
            "message": "ok"
        })))
        .mount(&server)
        .await;

    let auth = gateway(&server).login(&login_request()).await.unwrap();
    assert_eq!(auth.id, 77);
    assert_eq!(auth.email, None);
    assert_eq!(auth.name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn login_rejected_carries_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = gateway(&server).login(&login_request()).await.unwrap_err();
    match err {
        GatewayError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn register_posts_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(serde_json::json!({
            "email": "ana@example.com",
            "password": "pw",
            "name": "Ana"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 3,
            "email": "ana@example.com",
            "name": "Ana",
            "message": "User registered"
        })))
        .mount(&server)
        .await;

    let auth = gateway(&server)
        .register(&RegisterRequest {
            email: "ana@example.com".into(),
            password: "pw".into(),
            name: "Ana".into(),
        })
        .await
        .unwrap();
    assert_eq!(auth.id, 3);
}

// --- Orders ---

#[tokio::test]
async fn create_order_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(serde_json::json!({
            "userId": 3,
            "total": 25.5,
            "createdAt": 1000,
            "items": [
                {"productName": "Cafetera", "price": 10.0, "quantity": 2},
                {"productName": "Taza", "price": 5.5, "quantity": 1}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 90,
            "userId": 3,
            "total": 25.5,
            "createdAt": 1000,
            "items": [
                {"id": 1, "productName": "Cafetera", "price": 10.0, "quantity": 2},
                {"id": 2, "productName": "Taza", "price": 5.5, "quantity": 1}
            ]
        })))
        .mount(&server)
        .await;

    let request = CreateOrderRequest {
        user_id: 3,
        total: 25.5,
        created_at: 1000,
        items: vec![
            CreateOrderItemRequest {
                product_name: "Cafetera".into(),
                price: 10.0,
                quantity: 2,
            },
            CreateOrderItemRequest {
                product_name: "Taza".into(),
                price: 5.5,
                quantity: 1,
            },
        ],
    };

    let order = gateway(&server).create_order(&request).await.unwrap();
    assert_eq!(order.id, 90);
    assert_eq!(order.items.len(), 2);
}

#[tokio::test]
async fn orders_for_user_uses_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "userId": 3, "total": 12.99, "createdAt": 5, "items": []}
        ])))
        .mount(&server)
        .await;

    let orders = gateway(&server).orders_for_user(3).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].user_id, 3);
}

#[tokio::test]
async fn server_error_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/orders/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = gateway(&server).orders_for_user(3).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

// --- Products ---

#[tokio::test]
async fn list_products_decodes_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Cafetera", "description": "x", "price": 49.99,
             "imageUrl": "https://img/1.webp", "stock": 4, "createdAt": "2025-01-01"},
            {"id": 2, "name": "Mochila", "description": "y", "price": 39.99, "stock": 0}
        ])))
        .mount(&server)
        .await;

    let products = gateway(&server).list_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].image_url, None);

    let product = products[0].clone().into_product();
    assert_eq!(product.image_url.as_deref(), Some("https://img/1.webp"));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = gateway(&server).list_products().await.unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

// --- Transport ---

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let gateway = HttpGateway::new(&uri, Duration::from_secs(2)).unwrap();
    let err = gateway.login(&login_request()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(err.status(), None);
}

// --- External catalog ---

#[tokio::test]
async fn external_catalog_takes_limit_and_offsets_ids() {
    let server = MockServer::start().await;
    let products: Vec<serde_json::Value> = (1..=5)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "title": format!("Item {i}"),
                "description": "d",
                "price": 1.5,
                "thumbnail": format!("https://cdn/{i}.png")
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": products,
            "total": 194,
            "skip": 0,
            "limit": 30
        })))
        .mount(&server)
        .await;

    let catalog = ExternalCatalog::new(&server.uri(), Duration::from_secs(5), 3).unwrap();
    let fetched = catalog.fetch().await.unwrap();

    let ids: Vec<i64> = fetched.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![10_001, 10_002, 10_003]);
    assert_eq!(fetched[0].name, "Item 1");
}
