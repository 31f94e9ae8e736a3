//! Handler tests for Products domain
//!
//! These drive the products router the way the app mounts it
//! (`/api/products`) and check:
//! - CRUD status codes and bodies against each backing store
//! - Location header on create
//! - Error responses (404, 400, 409, 501)
//! - Strict versus lenient payload validation

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use cms_client::{
    ContentReference, ContentRepository, ContentResult, InMemoryContentStore, ProductPage,
};
use domain_products::*;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

const ROOT: ContentReference = ContentReference { id: 1, work_id: None };

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn mount<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    Router::new().nest("/api/products", handlers::router(service))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

#[derive(Debug, Clone, Copy)]
enum Backend {
    Memory,
    Cms,
}

const BACKENDS: [Backend; 2] = [Backend::Memory, Backend::Cms];

/// Router with the two demo products stored; returns their ids
async fn seeded_app(backend: Backend) -> (Router, Vec<i64>) {
    seeded_app_with(backend, ValidationMode::Strict).await
}

async fn seeded_app_with(backend: Backend, mode: ValidationMode) -> (Router, Vec<i64>) {
    match backend {
        Backend::Memory => {
            let repo = InMemoryProductRepository::new();
            repo.seed(demo_products()).await;
            (mount(ProductService::with_validation(repo, mode)), vec![1, 2])
        }
        Backend::Cms => {
            let repo = CmsProductRepository::new(InMemoryContentStore::new(), ROOT);
            let service = ProductService::with_validation(repo, mode);
            let mut ids = Vec::new();
            for product in demo_products() {
                let created = service
                    .create(product.name, product.description, product.price)
                    .await
                    .unwrap();
                ids.push(created.id);
            }
            (mount(service), ids)
        }
    }
}

fn missing_id(ids: &[i64]) -> i64 {
    ids.iter().max().copied().unwrap_or(0) + 97
}

#[tokio::test]
async fn test_list_returns_seeded_products() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;

        let response = send(&app, "GET", "/api/products", None).await;

        assert_eq!(response.status(), StatusCode::OK, "{:?}", backend);
        let products: Vec<Product> = json_body(response).await;
        assert_eq!(products.len(), 2, "{:?}", backend);
        assert_eq!(
            products.iter().map(|p| p.id).collect::<Vec<_>>(),
            ids,
            "{:?}",
            backend
        );
    }
}

#[tokio::test]
async fn test_get_returns_product() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;

        let response = send(&app, "GET", &format!("/api/products/{}", ids[0]), None).await;

        assert_eq!(response.status(), StatusCode::OK, "{:?}", backend);
        let product: Product = json_body(response).await;
        assert_eq!(product.id, ids[0]);
        assert_eq!(product.name, "Product 1");
        assert_eq!(product.price, Decimal::new(1000, 2));
    }
}

#[tokio::test]
async fn test_get_missing_returns_404() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;

        let uri = format!("/api/products/{}", missing_id(&ids));
        let response = send(&app, "GET", &uri, None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{:?}", backend);
        let body: Value = json_body(response).await;
        assert_eq!(body["code"], 1004);
        assert_eq!(body["error"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_get_non_integer_id_returns_400() {
    let (app, _) = seeded_app(Backend::Memory).await;

    let response = send(&app, "GET", "/api/products/abc", None).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response).await;
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_create_returns_201_with_location() {
    for backend in BACKENDS {
        let (app, _) = seeded_app(backend).await;

        let response = send(
            &app,
            "POST",
            "/api/products",
            Some(json!({ "name": "Desk lamp", "description": "Brass", "price": "24.99" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED, "{:?}", backend);
        let location = response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let created: Product = json_body(response).await;
        assert_eq!(location, format!("/api/products/{}", created.id));

        // create followed by get yields the input plus the assigned id
        let fetched: Product = json_body(send(&app, "GET", &location, None).await).await;
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Desk lamp");
        assert_eq!(fetched.description.as_deref(), Some("Brass"));
        assert_eq!(fetched.price, Decimal::new(2499, 2));
    }
}

#[tokio::test]
async fn test_create_accepts_numeric_price() {
    let (app, _) = seeded_app(Backend::Memory).await;

    let response = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Chair", "price": 15 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Product = json_body(response).await;
    assert_eq!(created.id, 3);
    assert_eq!(created.price, Decimal::from(15));
    assert_eq!(created.description, None);
}

#[tokio::test]
async fn test_create_with_colliding_id_returns_409() {
    let (app, _) = seeded_app(Backend::Memory).await;

    let response = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "id": 1, "name": "Dup", "price": "1.00" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_with_client_id_rejected_by_cms() {
    let (app, _) = seeded_app(Backend::Cms).await;

    let response = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "id": 50, "name": "Pinned", "price": "1.00" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_malformed_json_returns_400() {
    let (app, _) = seeded_app(Backend::Memory).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "POST",
        "/api/products",
        Some(json!({ "name": "Lamp", "price": "not-a-number" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_strict_validation_rejects_invalid_payloads() {
    for backend in BACKENDS {
        let (app, _) = seeded_app(backend).await;

        for payload in [
            json!({ "name": "", "price": "1.00" }),
            json!({ "name": "   ", "price": "1.00" }),
            json!({ "name": "Lamp", "price": "-0.01" }),
        ] {
            let response = send(&app, "POST", "/api/products", Some(payload.clone())).await;
            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "{:?} {}",
                backend,
                payload
            );
            let body: Value = json_body(response).await;
            assert_eq!(body["error"], "VALIDATION_ERROR");
            assert!(body["details"].is_object());
        }

        let products: Vec<Product> =
            json_body(send(&app, "GET", "/api/products", None).await).await;
        assert_eq!(products.len(), 2, "{:?}", backend);
    }
}

#[tokio::test]
async fn test_lenient_validation_persists_payload_as_given() {
    for backend in BACKENDS {
        let (app, _) = seeded_app_with(backend, ValidationMode::Lenient).await;

        let response = send(
            &app,
            "POST",
            "/api/products",
            Some(json!({ "name": "", "price": "-5.00" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED, "{:?}", backend);
        let created: Product = json_body(response).await;
        assert_eq!(created.name, "");
        assert_eq!(created.price, Decimal::new(-500, 2));
    }
}

#[tokio::test]
async fn test_update_returns_204_and_replaces_fields() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;
        let uri = format!("/api/products/{}", ids[0]);

        let response = send(
            &app,
            "PUT",
            &uri,
            Some(json!({
                "id": ids[0],
                "name": "Renamed",
                "description": "New",
                "price": "12.50"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{:?}", backend);

        let product: Product = json_body(send(&app, "GET", &uri, None).await).await;
        assert_eq!(product.name, "Renamed");
        assert_eq!(product.description.as_deref(), Some("New"));
        assert_eq!(product.price, Decimal::new(1250, 2));
    }
}

#[tokio::test]
async fn test_update_without_payload_id_uses_path_id() {
    let (app, _) = seeded_app(Backend::Memory).await;

    let response = send(
        &app,
        "PUT",
        "/api/products/2",
        Some(json!({ "name": "Renamed", "price": "1.00" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_update_missing_returns_404() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;
        let missing = missing_id(&ids);

        let response = send(
            &app,
            "PUT",
            &format!("/api/products/{}", missing),
            Some(json!({ "id": missing, "name": "Ghost", "price": "1.00" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{:?}", backend);
    }
}

#[tokio::test]
async fn test_update_id_mismatch_returns_409() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;

        let response = send(
            &app,
            "PUT",
            &format!("/api/products/{}", ids[0]),
            Some(json!({ "id": ids[1], "name": "Swapped", "price": "1.00" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT, "{:?}", backend);

        let unchanged: Product =
            json_body(send(&app, "GET", &format!("/api/products/{}", ids[0]), None).await).await;
        assert_eq!(unchanged.name, "Product 1");
    }
}

#[tokio::test]
async fn test_update_id_mismatch_with_invalid_payload_returns_409() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;

        let response = send(
            &app,
            "PUT",
            &format!("/api/products/{}", ids[0]),
            Some(json!({ "id": ids[1], "name": "", "price": "1.00" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT, "{:?}", backend);
        let body: Value = json_body(response).await;
        assert_eq!(body["error"], "CONFLICT");
    }
}

#[tokio::test]
async fn test_delete_then_get_and_delete_again() {
    for backend in BACKENDS {
        let (app, ids) = seeded_app(backend).await;
        let uri = format!("/api/products/{}", ids[0]);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{:?}", backend);

        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{:?}", backend);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{:?}", backend);

        let products: Vec<Product> =
            json_body(send(&app, "GET", "/api/products", None).await).await;
        assert_eq!(products.len(), 1, "{:?}", backend);
    }
}

/// Content repository that can read and write single items but cannot list
struct NoListingContent(InMemoryContentStore);

#[async_trait]
impl ContentRepository for NoListingContent {
    async fn get(&self, reference: ContentReference) -> ContentResult<ProductPage> {
        self.0.get(reference).await
    }

    async fn save(
        &self,
        page: ProductPage,
        action: cms_client::SaveAction,
        access: cms_client::AccessLevel,
    ) -> ContentResult<ContentReference> {
        self.0.save(page, action, access).await
    }

    async fn delete(&self, reference: ContentReference, force_delete: bool) -> ContentResult<()> {
        self.0.delete(reference, force_delete).await
    }
}

#[tokio::test]
async fn test_list_without_capability_returns_501() {
    let repo = CmsProductRepository::new(NoListingContent(InMemoryContentStore::new()), ROOT);
    let service = ProductService::new(repo);
    let created = service.create("Lamp", None, Decimal::ONE).await.unwrap();
    let app = mount(service);

    let response = send(&app, "GET", "/api/products", None).await;
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let body: Value = json_body(response).await;
    assert_eq!(body["error"], "NOT_IMPLEMENTED");

    // single-record access still works
    let response = send(&app, "GET", &format!("/api/products/{}", created.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
