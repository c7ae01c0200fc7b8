//! HTTP boundary.
//!
//! `GET /api/stock-prices?stock=GOOG[&stock=MSFT][&like=true]`
//!
//! Repeated `stock` keys form the symbol list, `like` counts only when it is given
//! once with the literal value `true`. The list is validated into a [`StockQuery`] here, so the
//! aggregator only ever sees one or two non-blank symbols. Failures are answered
//! with an [`ErrorBody`] and a status picked from the error kind.

use crate::aggregator::QuoteAggregator;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, error, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use stock_common::net::STOCK_PRICES_PATH;
use stock_common::stock_data::ErrorBody;
use stock_common::{ErrorKind, StockError, StockPricesResponse, StockQuery};
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Request orchestration.
    pub aggregator: Arc<QuoteAggregator>,
    /// Whether `X-Forwarded-For` names the requester.
    pub trust_forwarded: bool,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route(STOCK_PRICES_PATH, get(stock_prices))
        .with_state(state)
        .layer(cors)
}

/// GET /api/stock-prices - price and likes for one or two symbols.
async fn stock_prices(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<StockPricesResponse>, ApiError> {
    let symbols: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "stock")
        .map(|(_, value)| value.as_str())
        .collect();
    let likes: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "like")
        .map(|(_, value)| value.as_str())
        .collect();
    let wants_like = likes == ["true"];

    let query = StockQuery::from_raw(&symbols)?;
    let address = requester_address(&headers, peer, state.trust_forwarded);
    debug!("GET {} {:?} like={}", STOCK_PRICES_PATH, symbols, wants_like);

    let stock_data = state
        .aggregator
        .lookup(&query, wants_like, &address)
        .await?;
    Ok(Json(StockPricesResponse { stock_data }))
}

/// Address that identifies the requester: the socket peer, or the first
/// `X-Forwarded-For` hop when running behind a trusted proxy.
fn requester_address(headers: &HeaderMap, peer: SocketAddr, trust_forwarded: bool) -> String {
    if trust_forwarded {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());
        if let Some(hop) = forwarded {
            return hop.to_string();
        }
    }
    peer.ip().to_string()
}

/// Request failure rendered as JSON.
pub struct ApiError(StockError);

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::QuoteUnavailable => StatusCode::BAD_GATEWAY,
            ErrorKind::PersistenceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        match kind {
            ErrorKind::InvalidRequest => debug!("Rejected request: {}", self.0),
            ErrorKind::QuoteUnavailable => warn!("Request failed: {}", self.0),
            _ => error!("Request failed: {}", self.0),
        }
        let body = ErrorBody {
            error: kind.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::ledger::LikeLedger;
    use crate::store::fake::FailingStore;
    use crate::store::{LikeStore, MemoryStore};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(trust_forwarded: bool) -> Router {
        app_with_store(Arc::new(MemoryStore::new()), trust_forwarded)
    }

    fn app_with_store(store: Arc<dyn LikeStore>, trust_forwarded: bool) -> Router {
        let gateway = FakeGateway::default()
            .with_price("GOOG", 140.0)
            .with_price("MSFT", 410.0)
            .with_price("TSLA", 250.5);
        let aggregator = QuoteAggregator::new(Arc::new(gateway), LikeLedger::new(store));
        router(AppState {
            aggregator: Arc::new(aggregator),
            trust_forwarded,
        })
    }

    async fn get_json(
        app: &Router,
        uri: &str,
        peer: &str,
        forwarded: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(hop) = forwarded {
            builder = builder.header("x-forwarded-for", hop);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn single_symbol_response() {
        let app = app(false);
        let (status, body) =
            get_json(&app, "/api/stock-prices?stock=tsla", "10.0.0.1:5000", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"stockData": {"stock": "TSLA", "price": 250.5, "likes": 0}})
        );
    }

    #[tokio::test]
    async fn like_is_counted_once_per_address() {
        let app = app(false);
        let uri = "/api/stock-prices?stock=TSLA&like=true";
        get_json(&app, uri, "10.0.0.1:5000", None).await;
        // Same IP from another source port is the same requester.
        let (_, body) = get_json(&app, uri, "10.0.0.1:6000", None).await;
        assert_eq!(body["stockData"]["likes"], 1);

        let (_, body) = get_json(&app, uri, "10.0.0.2:5000", None).await;
        assert_eq!(body["stockData"]["likes"], 2);
    }

    #[tokio::test]
    async fn like_flag_must_be_literal_true() {
        let app = app(false);
        let (_, body) = get_json(
            &app,
            "/api/stock-prices?stock=TSLA&like=1",
            "10.0.0.1:5000",
            None,
        )
        .await;
        assert_eq!(body["stockData"]["likes"], 0);
    }

    #[tokio::test]
    async fn two_symbols_response() {
        let app = app(false);
        get_json(&app, "/api/stock-prices?stock=MSFT&like=true", "10.0.0.1:1", None).await;
        get_json(&app, "/api/stock-prices?stock=MSFT&like=true", "10.0.0.2:1", None).await;

        let (status, body) = get_json(
            &app,
            "/api/stock-prices?stock=goog&stock=msft",
            "10.0.0.3:1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"stockData": [
                {"stock": "GOOG", "price": 140.0, "rel_likes": -2},
                {"stock": "MSFT", "price": 410.0, "rel_likes": 2}
            ]})
        );
    }

    #[tokio::test]
    async fn invalid_symbol_lists_are_bad_requests() {
        let app = app(false);
        for uri in [
            "/api/stock-prices",
            "/api/stock-prices?stock=",
            "/api/stock-prices?stock=A&stock=B&stock=C",
        ] {
            let (status, body) = get_json(&app, uri, "10.0.0.1:1", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["error"], "InvalidRequest");
        }
    }

    #[tokio::test]
    async fn unknown_symbol_is_bad_gateway() {
        let app = app(false);
        let (status, body) = get_json(
            &app,
            "/api/stock-prices?stock=GOOG&stock=NOPE",
            "10.0.0.1:1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "QuoteUnavailable");
        assert!(body.get("stockData").is_none());
    }

    #[tokio::test]
    async fn unreachable_store_is_service_unavailable() {
        let app = app_with_store(Arc::new(FailingStore::failing_on(&["MSFT"])), false);
        let (status, body) = get_json(
            &app,
            "/api/stock-prices?stock=GOOG&stock=MSFT&like=true",
            "10.0.0.1:1",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "PersistenceUnavailable");
        assert!(body.get("stockData").is_none());
    }

    #[tokio::test]
    async fn repeated_like_key_is_not_a_like() {
        let app = app(false);
        let (_, body) = get_json(
            &app,
            "/api/stock-prices?stock=TSLA&like=false&like=true",
            "10.0.0.1:5000",
            None,
        )
        .await;
        assert_eq!(body["stockData"]["likes"], 0);

        let (_, body) = get_json(
            &app,
            "/api/stock-prices?stock=TSLA&like=true&like=true",
            "10.0.0.1:5000",
            None,
        )
        .await;
        assert_eq!(body["stockData"]["likes"], 0);
    }

    #[tokio::test]
    async fn forwarded_address_used_only_when_trusted() {
        let trusted = app(true);
        let uri = "/api/stock-prices?stock=TSLA&like=true";
        get_json(&trusted, uri, "10.0.0.1:1", Some("198.51.100.4, 10.0.0.1")).await;
        let (_, body) =
            get_json(&trusted, uri, "10.0.0.1:1", Some("198.51.100.5, 10.0.0.1")).await;
        assert_eq!(body["stockData"]["likes"], 2);

        let untrusted = app(false);
        get_json(&untrusted, uri, "10.0.0.1:1", Some("198.51.100.4")).await;
        let (_, body) = get_json(&untrusted, uri, "10.0.0.1:1", Some("198.51.100.5")).await;
        assert_eq!(body["stockData"]["likes"], 1);
    }

    #[test]
    fn requester_address_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.1:4000".parse().unwrap();
        let mut headers = HeaderMap::new();
        assert_eq!(requester_address(&headers, peer, true), "192.0.2.1");
        headers.insert("x-forwarded-for", " , 10.0.0.1".parse().unwrap());
        assert_eq!(requester_address(&headers, peer, true), "192.0.2.1");
    }
}
