//! HTTP API server implementation

use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Multipart, Query, Request, State,
    },
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::core::config::ServerSettings;
use crate::core::errors::DispatchError;
use crate::core::models::LanguageInfo;
use crate::core::validator::RawTranslateInput;
use crate::server::{docs, pages, rate_limit::RateLimiter};
use crate::service::dispatch::Dispatcher;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Translation pipeline
    pub dispatcher: Dispatcher,
    /// Boot-time server settings
    pub settings: Arc<ServerSettings>,
    /// Present when a request limit is configured
    pub limiter: Option<RateLimiter>,
}

impl AppState {
    /// State for `dispatcher`, with a limiter when `settings.req_limit` is set
    pub fn new(dispatcher: Dispatcher, settings: ServerSettings) -> Self {
        let limiter = settings.req_limit.map(RateLimiter::per_hour);
        Self {
            dispatcher,
            settings: Arc::new(settings),
            limiter,
        }
    }
}

/// Translate parameters, as documented
#[derive(Deserialize, ToSchema)]
pub struct TranslateBody {
    /// Text to translate
    #[schema(example = "Hello world!")]
    pub q: String,
    /// Source language code
    #[schema(example = "en")]
    pub source: String,
    /// Target language code
    #[schema(example = "es")]
    pub target: String,
}

/// Successful translation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranslateResponse {
    /// Translated text
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

/// Error envelope shared by every failure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Status plus message, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Error with an explicit status
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 with `message`
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request: {}", rejection.body_text()))
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::bad_request(format!("Invalid request: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// `q`, `source` and `target` read from a JSON body, or else from the query
/// string and form fields (query first)
#[derive(Debug)]
pub struct TranslateParams(pub RawTranslateInput);

fn content_type(req: &Request) -> String {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// `application/json` or any `application/*+json` type
fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

async fn multipart_fields(mut multipart: Multipart) -> Result<RawTranslateInput, ApiError> {
    let mut input = RawTranslateInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid request: {}", e.body_text())))?
    {
        let slot = match field.name() {
            Some("q") => &mut input.q,
            Some("source") => &mut input.source,
            Some("target") => &mut input.target,
            _ => continue,
        };

        if slot.is_none() {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid request: {}", e.body_text())))?;
            *slot = Some(value);
        }
    }

    Ok(input)
}

#[async_trait]
impl<S> FromRequest<S> for TranslateParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = content_type(&req);

        if is_json(&content_type) {
            let Json(input) = Json::<RawTranslateInput>::from_request(req, state).await?;
            return Ok(Self(input));
        }

        // Pairs rather than a struct so a repeated key keeps its first value
        let query = Query::<Vec<(String, String)>>::try_from_uri(req.uri())
            .map(|Query(pairs)| RawTranslateInput::from_pairs(pairs))
            .unwrap_or_default();

        let form = if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            RawTranslateInput::from_pairs(pairs)
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid request: {}", e.body_text())))?;
            multipart_fields(multipart).await?
        } else {
            RawTranslateInput::default()
        };

        Ok(Self(query.or(form)))
    }
}

/// Retrieve list of supported languages
#[utoipa::path(
    get,
    path = "/languages",
    tag = "translate",
    responses(
        (status = 200, description = "List of languages", body = [LanguageInfo]),
        (status = 429, description = "Request limit reached", body = ErrorResponse)
    )
)]
pub async fn languages(State(state): State<Arc<AppState>>) -> Json<Vec<LanguageInfo>> {
    Json(state.dispatcher.languages())
}

/// Translate text from a language to another
#[utoipa::path(
    post,
    path = "/translate",
    tag = "translate",
    request_body(
        content = TranslateBody,
        description = "Also accepted as form fields (urlencoded or multipart) or query parameters",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Translated text", body = TranslateResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 429, description = "Request limit reached", body = ErrorResponse),
        (status = 500, description = "Translation error", body = ErrorResponse)
    )
)]
pub async fn translate(
    State(state): State<Arc<AppState>>,
    TranslateParams(input): TranslateParams,
) -> Result<Json<TranslateResponse>, ApiError> {
    let translated_text = state.dispatcher.dispatch(input).await?;
    Ok(Json(TranslateResponse { translated_text }))
}

/// CORS preflight
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Cross-origin headers attached to every response
const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", "*"),
    ("access-control-allow-headers", "Authorization, Content-Type"),
    ("access-control-expose-headers", "Authorization"),
    ("access-control-allow-methods", "GET, POST"),
    ("access-control-allow-credentials", "true"),
    // 20 days
    ("access-control-max-age", "1728000"),
];

fn with_cors_headers(router: Router) -> Router {
    CORS_HEADERS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/languages", get(languages).options(preflight))
        .route("/translate", post(translate).options(preflight))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            crate::server::rate_limit::enforce,
        ));

    let app = Router::new()
        .route("/", get(pages::index))
        .route("/spec", get(docs::spec))
        .route("/docs", get(docs::swagger_ui))
        .merge(api)
        .with_state(state);

    with_cors_headers(app).layer(TraceLayer::new_for_http())
}

/// Listen on the configured host and port. The host may be a name such as
/// "localhost" or an IPv4/IPv6 literal.
pub async fn bind(settings: &ServerSettings) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve the API on an already bound listener
pub async fn serve(
    listener: TcpListener,
    dispatcher: Dispatcher,
    settings: ServerSettings,
) -> anyhow::Result<()> {
    info!(
        "Serving {} languages, char limit {}, req limit {}",
        dispatcher.registry().len(),
        dispatcher.char_limit(),
        settings
            .req_limit
            .map(|n| format!("{}/hour", n))
            .unwrap_or_else(|| "unlimited".to_string())
    );
    if settings.trust_proxy {
        info!("Rate limiting by X-Forwarded-For");
    }
    debug!("Resolver: {:?}", dispatcher.resolver());

    let state = Arc::new(AppState::new(dispatcher, settings));
    let app = router(state);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Run the HTTP server
pub async fn run_server(dispatcher: Dispatcher, settings: ServerSettings) -> anyhow::Result<()> {
    let listener = bind(&settings).await?;
    serve(listener, dispatcher, settings).await
}
