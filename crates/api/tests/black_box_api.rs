use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};

use stockroom_api::app::services::AppServices;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let app = stockroom_api::app::build_app(Arc::new(AppServices::in_memory()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = self.client.request(method, self.url(path));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await.unwrap();
        let status = res.status();
        let text = res.text().await.unwrap();
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap()
        };
        (status, body)
    }

    async fn create_product(&self, name: &str, quantity: i64) -> String {
        let (status, body) = self
            .send(
                reqwest::Method::POST,
                "/products",
                Some(json!({"name": name, "quantity": quantity})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["_id"].as_str().unwrap().to_string()
    }

    async fn stock(&self, id: &str) -> i64 {
        let (status, body) = self.send(reqwest::Method::GET, &format!("/products/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        body["quantity"].as_i64().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn err(code: &str, message: &str) -> Value {
    json!({"err": {"code": code, "message": message}})
}

#[tokio::test]
async fn health_check_is_ok() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn product_lifecycle() {
    let srv = TestServer::spawn().await;
    let id = srv.create_product("Produto do Batista", 100).await;

    let (status, body) = srv.send(reqwest::Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"products": [{"_id": id, "name": "Produto do Batista", "quantity": 100}]})
    );

    let (status, body) = srv
        .send(
            reqwest::Method::PUT,
            &format!("/products/{id}"),
            Some(json!({"name": "Produto do Batista", "quantity": 5})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 5);

    let (status, body) = srv.send(reqwest::Method::DELETE, &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], id.as_str());

    let (status, body) = srv.send(reqwest::Method::GET, &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, err("invalid_data", "Wrong id format"));
}

#[tokio::test]
async fn product_validation_errors_are_422() {
    let srv = TestServer::spawn().await;
    srv.create_product("widget", 10).await;

    let cases = [
        (json!({"name": "abc", "quantity": 1}), "\"name\" length must be at least 5 characters long"),
        (json!({"name": "widget", "quantity": 1}), "Product already exists"),
        (json!({"name": "gadget", "quantity": 0}), "\"quantity\" must be larger than or equal to 1"),
        (json!({"name": "gadget", "quantity": "1"}), "\"quantity\" must be a number"),
        (json!({"quantity": 1}), "\"name\" is required"),
    ];
    for (payload, message) in cases {
        let (status, body) = srv.send(reqwest::Method::POST, "/products", Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, err("invalid_data", message));
    }
}

#[tokio::test]
async fn sale_create_and_delete_move_stock() {
    let srv = TestServer::spawn().await;
    let widget = srv.create_product("widget", 10).await;

    let (status, sale) = srv
        .send(
            reqwest::Method::POST,
            "/sales",
            Some(json!([{"productId": widget, "quantity": 4}])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sale["itemsSold"], json!([{"productId": widget, "quantity": 4}]));
    assert_eq!(srv.stock(&widget).await, 6);

    let sale_id = sale["_id"].as_str().unwrap();
    let (status, body) = srv.send(reqwest::Method::GET, "/sales", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"sales": [sale.clone()]}));

    let (status, body) = srv.send(reqwest::Method::DELETE, &format!("/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sale);
    assert_eq!(srv.stock(&widget).await, 10);

    let (status, body) = srv.send(reqwest::Method::GET, &format!("/sales/{sale_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, err("not_found", "Sale not found"));
}

#[tokio::test]
async fn insufficient_stock_is_404_on_create() {
    let srv = TestServer::spawn().await;
    let widget = srv.create_product("widget", 10).await;

    let (status, body) = srv
        .send(
            reqwest::Method::POST,
            "/sales",
            Some(json!([{"productId": widget, "quantity": 20}])),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, err("stock_problem", "Such amount is not permitted to sell"));
    assert_eq!(srv.stock(&widget).await, 10);
}

#[tokio::test]
async fn invalid_items_are_422() {
    let srv = TestServer::spawn().await;
    let widget = srv.create_product("widget", 10).await;
    let expected = err("invalid_data", "Wrong product ID or invalid quantity");

    for payload in [
        json!([{"productId": "ffffffffffffffffffffffff", "quantity": 1}]),
        json!([{"productId": widget, "quantity": 0}]),
        json!([{"productId": widget, "quantity": "2"}]),
        json!({"productId": widget, "quantity": 1}),
    ] {
        let (status, body) = srv.send(reqwest::Method::POST, "/sales", Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, expected);
    }
    assert_eq!(srv.stock(&widget).await, 10);
}

#[tokio::test]
async fn empty_sale_is_accepted() {
    let srv = TestServer::spawn().await;
    let (status, sale) = srv.send(reqwest::Method::POST, "/sales", Some(json!([]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sale["itemsSold"], json!([]));
}

#[tokio::test]
async fn product_update_reports_field_errors_before_id() {
    let srv = TestServer::spawn().await;
    let (status, body) = srv
        .send(
            reqwest::Method::PUT,
            "/products/123",
            Some(json!({"name": "abc", "quantity": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        err("invalid_data", "\"name\" length must be at least 5 characters long")
    );
}

#[tokio::test]
async fn sale_update_deducts_without_restoring() {
    let srv = TestServer::spawn().await;
    let widget = srv.create_product("widget", 10).await;

    let (_, sale) = srv
        .send(
            reqwest::Method::POST,
            "/sales",
            Some(json!([{"productId": widget, "quantity": 3}])),
        )
        .await;
    let sale_id = sale["_id"].as_str().unwrap();

    let (status, updated) = srv
        .send(
            reqwest::Method::PUT,
            &format!("/sales/{sale_id}"),
            Some(json!([{"productId": widget, "quantity": 2}])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["itemsSold"], json!([{"productId": widget, "quantity": 2}]));
    // Update does not give the first 3 back.
    assert_eq!(srv.stock(&widget).await, 5);
}

#[tokio::test]
async fn sale_id_errors() {
    let srv = TestServer::spawn().await;
    let widget = srv.create_product("widget", 10).await;

    let (status, body) = srv.send(reqwest::Method::DELETE, "/sales/abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, err("invalid_data", "Wrong sale ID format"));

    let (status, body) = srv
        .send(
            reqwest::Method::PUT,
            "/sales/ffffffffffffffffffffffff",
            Some(json!([{"productId": widget, "quantity": 1}])),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, err("invalid_data", "Wrong product ID or invalid quantity"));

    let (status, body) = srv.send(reqwest::Method::GET, "/sales/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, err("not_found", "Sale not found"));
}
