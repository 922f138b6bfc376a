//! Fake marketplace for integration testing.
//!
//! An in-process `axum` server on 127.0.0.1 that mimics the item-summary
//! search endpoint, serves listing images, and answers the connectivity
//! probe. Every search request is recorded so tests can assert on what the
//! client actually sent.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TOKEN: &str = "test-token";
pub const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";

/// One recorded search request.
#[derive(Debug, Clone)]
pub struct SeenQuery {
    pub q: String,
    pub limit: String,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MarketState {
    base: String,
    seen: Arc<Mutex<Vec<SeenQuery>>>,
}

/// Handle to a running fake marketplace.
pub struct FakeMarket {
    pub base: String,
    seen: Arc<Mutex<Vec<SeenQuery>>>,
}

impl FakeMarket {
    /// Bind to an ephemeral port and start serving in the background.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let state = MarketState {
            base: base.clone(),
            seen: seen.clone(),
        };
        let app = Router::new()
            .route(SEARCH_PATH, get(search))
            .route("/broken/search", get(broken))
            .route("/images/:name", get(image))
            .route("/", get(api_root))
            .route("/down", get(down))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base, seen }
    }

    pub fn search_url(&self) -> String {
        format!("{}{SEARCH_PATH}", self.base)
    }

    pub fn seen(&self) -> Vec<SeenQuery> {
        self.seen.lock().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn search(
    State(state): State<MarketState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let q = params.get("q").cloned().unwrap_or_default();
    state.seen.lock().unwrap().push(SeenQuery {
        q: q.clone(),
        limit: params.get("limit").cloned().unwrap_or_default(),
        authorization: authorization.clone(),
    });

    let expected = format!("Bearer {TOKEN}");
    if authorization.as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"errors": [{"errorId": 1001, "message": "Invalid access token"}]})),
        );
    }

    let body = match q.as_str() {
        "Nintendo DS Lite" => nintendo_ds_lite(&state.base),
        "Game Boy" => game_boy(),
        _ => json!({"total": 0}),
    };
    (StatusCode::OK, Json(body))
}

async fn broken() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "x".repeat(500))
}

async fn image(Path(name): Path<String>) -> impl IntoResponse {
    if name.starts_with("missing") {
        (StatusCode::NOT_FOUND, Vec::new())
    } else {
        (StatusCode::OK, name.into_bytes())
    }
}

async fn api_root() -> Json<Value> {
    Json(json!({
        "current_user_url": "https://api.example.com/user",
        "emojis_url": "https://api.example.com/emojis",
        "events_url": "https://api.example.com/events"
    }))
}

async fn down() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

fn item(title: &str, price: Option<&str>, image: Option<String>, id: u32) -> Value {
    let mut v = json!({
        "itemId": format!("v1|{id}|0"),
        "title": title,
        "condition": "Used",
        "itemWebUrl": format!("https://www.example.com/itm/{id}"),
    });
    if let Some(p) = price {
        v["price"] = json!({"value": p, "currency": "USD"});
    }
    if let Some(url) = image {
        v["image"] = json!({"imageUrl": url});
    }
    v
}

/// 12 results: 2 without a price, 1 sold for parts, 9 usable.
fn nintendo_ds_lite(base: &str) -> Value {
    let img = |name: &str| Some(format!("{base}/images/{name}"));
    let mut no_value = item("Nintendo DS Lite", None, None, 8);
    no_value["price"] = json!({"currency": "USD"});

    json!({
        "total": 12,
        "itemSummaries": [
            item("Nintendo DS Lite Cobalt", Some("52.00"), img("ok-a.jpg"), 1),
            item("Nintendo DS Lite (no price)", None, None, 2),
            item("Nintendo DS Lite Pink", Some("55.00"), img("ok-b.jpg"), 3),
            item("Nintendo DS Lite FOR PARTS", Some("15.00"), img("ok-x.jpg"), 4),
            item("DS Lite bundle", Some("62.00"), img("ok-c.png"), 5),
            item("Nintendo DS Lite White", Some("45.00"), None, 6),
            item("Nintendo DS Lite Black", Some("58.00"), img("missing.jpg"), 7),
            no_value,
            item("Nintendo DS Lite Red", Some("50.00"), img("ok-d.jpg"), 9),
            item("Nintendo DS Lite + games", Some("60.00"), img("ok-e.jpg"), 10),
            item("Nintendo DS Lite Silver", Some("48.00"), img("ok-f.jpg"), 11),
            item("Nintendo DS Lite Onyx", Some("55.00"), img("ok-g.jpg"), 12),
        ]
    })
}

/// Malformed prices mixed with valid ones, including a numeric value.
fn game_boy() -> Value {
    let mut numeric = item("Game Boy DMG", None, None, 3);
    numeric["price"] = json!({"value": 40.5, "currency": "USD"});

    json!({
        "total": 5,
        "itemSummaries": [
            item("Game Boy Color", Some("35.00"), None, 1),
            item("Game Boy Pocket", Some("N/A"), None, 2),
            numeric,
            item("Game Boy broken screen", Some("oops"), None, 4),
            item("Game Boy Advance", Some(""), None, 5),
        ]
    })
}
