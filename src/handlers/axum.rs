use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::CarbonLedger;
use carbon_ledger_core::{DatabaseAdapter, HttpMethod, LedgerError, LedgerRequest, LedgerResponse};

/// Request bodies above this size are rejected before reaching a plugin.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Integration trait for the Axum web framework.
pub trait AxumIntegration<DB: DatabaseAdapter> {
    /// Create an Axum router serving every ledger route.
    fn axum_router(self) -> Router;
}

impl<DB: DatabaseAdapter> AxumIntegration<DB> for Arc<CarbonLedger<DB>> {
    fn axum_router(self) -> Router {
        let mut router = Router::new()
            .route("/ok", get(create_ledger_handler::<DB>()))
            .route("/health", get(create_ledger_handler::<DB>()));

        for route in self.routes() {
            let handler_fn = create_ledger_handler::<DB>();
            router = match route.method {
                HttpMethod::Get => router.route(&route.path, get(handler_fn)),
                HttpMethod::Post => router.route(&route.path, post(handler_fn)),
                HttpMethod::Put => router.route(&route.path, axum::routing::put(handler_fn)),
                HttpMethod::Delete => router.route(&route.path, axum::routing::delete(handler_fn)),
                HttpMethod::Patch => router.route(&route.path, axum::routing::patch(handler_fn)),
                HttpMethod::Options | HttpMethod::Head => router,
            };
        }

        router.with_state(self)
    }
}

fn create_ledger_handler<DB: DatabaseAdapter>() -> impl Fn(
    State<Arc<CarbonLedger<DB>>>,
    Request,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Response> + Send>,
> + Clone {
    |State(ledger): State<Arc<CarbonLedger<DB>>>, req: Request| {
        Box::pin(async move {
            match convert_axum_request(req).await {
                Ok(ledger_req) => match ledger.handle_request(ledger_req).await {
                    Ok(response) => convert_ledger_response(response),
                    Err(err) => convert_ledger_error(err),
                },
                Err(err) => convert_ledger_error(err),
            }
        })
    }
}

async fn convert_axum_request(req: Request) -> Result<LedgerRequest, LedgerError> {
    let (parts, body) = req.into_parts();

    let method = match parts.method {
        axum::http::Method::GET => HttpMethod::Get,
        axum::http::Method::POST => HttpMethod::Post,
        axum::http::Method::PUT => HttpMethod::Put,
        axum::http::Method::DELETE => HttpMethod::Delete,
        axum::http::Method::PATCH => HttpMethod::Patch,
        axum::http::Method::OPTIONS => HttpMethod::Options,
        axum::http::Method::HEAD => HttpMethod::Head,
        _ => return Err(LedgerError::bad_request("Unsupported HTTP method")),
    };

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    let mut query = HashMap::new();
    if let Some(query_str) = parts.uri.query() {
        for (key, value) in url::form_urlencoded::parse(query_str.as_bytes()) {
            query.insert(key.to_string(), value.to_string());
        }
    }

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| LedgerError::bad_request("Request body too large"))?;
    let body = (!bytes.is_empty()).then(|| bytes.to_vec());

    Ok(LedgerRequest::from_parts(
        method,
        parts.uri.path().to_string(),
        headers,
        body,
        query,
    ))
}

fn convert_ledger_response(ledger_response: LedgerResponse) -> Response {
    let mut response = Response::builder().status(
        StatusCode::from_u16(ledger_response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    );

    for (name, value) in ledger_response.headers {
        if let (Ok(header_name), Ok(header_value)) = (
            axum::http::HeaderName::from_bytes(name.as_bytes()),
            axum::http::HeaderValue::from_str(&value),
        ) {
            response = response.header(header_name, header_value);
        }
    }

    response
        .body(axum::body::Body::from(ledger_response.body))
        .unwrap_or_else(|_| {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        })
}

fn convert_ledger_error(err: LedgerError) -> Response {
    let status_code =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match err.status_code() {
        500 => "Internal server error".to_string(),
        _ => err.to_string(),
    };

    (status_code, axum::Json(serde_json::json!({ "message": message }))).into_response()
}
