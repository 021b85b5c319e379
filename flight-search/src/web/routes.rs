//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tower_http::services::ServeDir;
use tracing::{info, warn};
use uuid::Uuid;

use crate::airports::DEFAULT_LIMIT;
use crate::bookmarks::{Bookmark, BookmarkError, BookmarkRepository, NewBookmark};
use crate::domain::{
    DomainError, FilterCriteria, IataCode, InvalidSort, Passengers, SortBy, SortOrder, SortSpec,
    parse_local_datetime,
};
use crate::provider::{FlightProvider, ProviderError};
use crate::results::ResultPipeline;

use super::dto::*;
use super::state::AppState;

/// Largest page any endpoint returns.
const MAX_LIMIT: usize = 50;

/// Header carrying the authenticated user id, set by the auth layer in front.
const USER_HEADER: &str = "x-user-id";

/// Create the application router.
///
/// `data_dir` is served under `/data` (the airport dataset lives there).
pub fn create_router(state: AppState, data_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/airports/search", get(search_airports))
        .route("/api/airports/:code", get(get_airport))
        .route("/api/flights", get(search_flights))
        .route("/api/me/bookmarks", get(list_bookmarks).post(add_bookmark))
        .route("/api/me/bookmarks/:bookmark_id", delete(delete_bookmark))
        .nest_service("/data", ServeDir::new(data_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search airports by code, name or city.
async fn search_airports(
    State(state): State<AppState>,
    Query(req): Query<AirportSearchRequest>,
) -> Json<AirportSearchResponse> {
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let page = state
        .airports
        .search_page(&req.q, req.offset.unwrap_or(0), limit);

    Json(AirportSearchResponse {
        airports: page.items,
        next_offset: page.next_offset,
    })
}

/// Resolve one airport by IATA code.
async fn get_airport(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AirportResponse>, AppError> {
    let airport = state
        .airports
        .resolve(&code)
        .ok_or_else(|| AppError::NotFound {
            message: format!("unknown airport: {code}"),
        })?;

    Ok(Json(AirportResponse {
        airport: airport.clone(),
        label: state.airports.display_name(&code),
    }))
}

/// Search flights, then filter, sort and page the results.
async fn search_flights(
    State(state): State<AppState>,
    Query(req): Query<FlightSearchRequest>,
) -> Result<Json<FlightSearchResponse>, AppError> {
    let criteria = criteria_from(&req)?;
    criteria.ensure_not_past(state.clock.now().date())?;
    let sort = sort_from(&req)?;
    let limit = req.limit.unwrap_or(state.pipeline.page_size).min(MAX_LIMIT);
    let offset = req.offset.unwrap_or(0);

    let mut pipeline = ResultPipeline::new(state.pipeline.with_page_size(limit))
        .with_clock(state.clock.clone());
    pipeline.set_filter_criteria(criteria.clone());

    let flights = state.provider.search_flights(&criteria).await?;
    pipeline.set_flights(flights);
    pipeline.set_sort(sort);

    let page = pipeline.page_at(offset);
    info!(
        origin = %criteria.origin(),
        destination = %criteria.destination(),
        %sort,
        offset,
        returned = page.items.len(),
        total = pipeline.total(),
        "flight search"
    );

    Ok(Json(FlightSearchResponse {
        flights: page.items,
        next_offset: page.next_offset,
        total: pipeline.total(),
    }))
}

fn criteria_from(req: &FlightSearchRequest) -> Result<FilterCriteria, AppError> {
    let origin = IataCode::parse_normalized(&req.origin_location_code).map_err(|e| {
        AppError::BadRequest {
            message: format!("invalid origin: {e}"),
        }
    })?;
    let destination = IataCode::parse_normalized(&req.destination_location_code).map_err(|e| {
        AppError::BadRequest {
            message: format!("invalid destination: {e}"),
        }
    })?;

    let passengers = Passengers::new(
        req.adults.unwrap_or(1),
        req.children.unwrap_or(0),
        req.infants.unwrap_or(0),
    )?;

    let mut criteria =
        FilterCriteria::new(origin, destination, req.departure_date)?.with_passengers(passengers);

    let return_date = req
        .return_date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(raw) = return_date {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("invalid return date: {raw}"),
        })?;
        criteria = criteria.with_return_date(date)?;
    }

    Ok(criteria)
}

/// List the caller's bookmarks.
async fn list_bookmarks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<BookmarkListRequest>,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    let user_id = user_id(&headers)?;
    let after = req
        .departure_at
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_departure_at)
        .transpose()?;

    Ok(Json(state.bookmarks.list(&user_id, after).await))
}

/// Save a search for the caller.
async fn add_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let user_id = user_id(&headers)?;
    if req.search_params.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "searchParams must not be empty".to_string(),
        });
    }
    let departure_at = parse_departure_at(&req.departure_at)?;

    let bookmark = state
        .bookmarks
        .add(
            &user_id,
            NewBookmark {
                search_params: req.search_params,
                departure_at,
            },
        )
        .await?;

    info!(%user_id, id = %bookmark.id, "bookmark saved");
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Delete one of the caller's bookmarks.
async fn delete_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(bookmark_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user_id = user_id(&headers)?;
    state.bookmarks.delete(&user_id, bookmark_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn user_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized {
            message: "sign in to manage bookmarks".to_string(),
        })
}

/// A local timestamp, or a bare date meaning its midnight.
fn parse_departure_at(raw: &str) -> Result<NaiveDateTime, AppError> {
    parse_local_datetime(raw)
        .or_else(|| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| AppError::BadRequest {
            message: format!("invalid departure time: {raw}"),
        })
}

fn sort_from(req: &FlightSearchRequest) -> Result<SortSpec, AppError> {
    let by = req
        .sort_by
        .as_deref()
        .map(str::parse::<SortBy>)
        .transpose()?
        .unwrap_or_default();
    let order = req
        .order
        .as_deref()
        .map(str::parse::<SortOrder>)
        .transpose()?
        .unwrap_or_default();
    Ok(SortSpec::new(by, order))
}

// ============================================================================
// Error handling
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    NotFound { message: String },
    Conflict { message: String },
    BadGateway { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<InvalidSort> for AppError {
    fn from(e: InvalidSort) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl From<BookmarkError> for AppError {
    fn from(e: BookmarkError) -> Self {
        match e {
            BookmarkError::Duplicate { .. } => AppError::Conflict {
                message: e.to_string(),
            },
            BookmarkError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::{AirportDirectory, AirportRanker};
    use crate::bookmarks::InMemoryBookmarkRepository;
    use crate::cache::{CacheConfig, CachedFlightProvider};
    use crate::domain::Airport;
    use crate::provider::{AmadeusClient, AmadeusConfig, FlightSource, StaticFlightProvider};
    use crate::results::fixtures::three_flights;
    use crate::results::{FixedClock, PipelineConfig};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn airports() -> AirportDirectory {
        AirportDirectory::from_airports(vec![
            Airport::new("KUL", "Kuala Lumpur International Airport").with_city("Kuala Lumpur"),
            Airport::new("IKA", "Imam Khomeini International Airport").with_city("Tehran"),
            Airport::new("LAS", "Harry Reid International Airport").with_city("Las Vegas"),
            Airport::new("LAX", "Los Angeles International Airport").with_city("Los Angeles"),
        ])
        .with_ranker(AirportRanker::city_aware())
    }

    fn state(provider: FlightSource) -> AppState {
        let now = NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        AppState::new(provider, airports(), PipelineConfig::default())
            .with_clock(FixedClock(now))
            .with_bookmarks(InMemoryBookmarkRepository::new().with_clock(FixedClock(now)))
    }

    fn app() -> Router {
        let provider = FlightSource::Static(StaticFlightProvider::new(three_flights()));
        create_router(state(provider), "data")
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn flight_ids(body: &Value) -> Vec<&str> {
        body["flights"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["id"].as_str().unwrap())
            .collect()
    }

    const ROUTE: &str = "originLocationCode=KUL&destinationLocationCode=IKA&departureDate=2025-05-21";

    #[tokio::test]
    async fn health_check() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn airport_search_ranks_and_pages() {
        let (status, body) = get(app(), "/api/airports/search?q=la&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["airports"][0]["code"], "LAS");
        assert_eq!(body["next_offset"], 1);

        let (_, body) = get(app(), "/api/airports/search?q=tehran").await;
        assert_eq!(body["airports"][0]["code"], "IKA");
        assert_eq!(body["next_offset"], Value::Null);
    }

    #[tokio::test]
    async fn blank_airport_query_is_empty() {
        let (status, body) = get(app(), "/api/airports/search").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["airports"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn airport_by_code() {
        let (status, body) = get(app(), "/api/airports/kul").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], "KUL");
        assert_eq!(body["label"], "Kuala Lumpur International Airport (KUL)");

        let (status, body) = get(app(), "/api/airports/XXX").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("XXX"));
    }

    #[tokio::test]
    async fn flights_default_to_cheapest_first() {
        let (status, body) = get(app(), &format!("/api/flights?{ROUTE}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(flight_ids(&body), ["2", "1", "3"]);
        assert_eq!(body["total"], 3);
        assert_eq!(body["next_offset"], Value::Null);
    }

    #[tokio::test]
    async fn flights_sort_and_page() {
        let uri = format!("/api/flights?{ROUTE}&sortBy=stops&order=desc&limit=2");
        let (_, body) = get(app(), &uri).await;
        assert_eq!(flight_ids(&body), ["3", "2"]);
        assert_eq!(body["next_offset"], 2);

        let (_, body) = get(app(), &format!("{uri}&offset=2")).await;
        assert_eq!(flight_ids(&body), ["1"]);
        assert_eq!(body["next_offset"], Value::Null);
    }

    #[tokio::test]
    async fn flights_on_other_day_are_filtered() {
        let uri = "/api/flights?originLocationCode=KUL&destinationLocationCode=IKA&departureDate=2025-05-22";
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn invalid_criteria_are_rejected() {
        let same = "/api/flights?originLocationCode=KUL&destinationLocationCode=kul&departureDate=2025-05-21";
        let (status, _) = get(app(), same).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(app(), &format!("/api/flights?{ROUTE}&adults=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(app(), &format!("/api/flights?{ROUTE}&returnDate=2025-05-01")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get(app(), &format!("/api/flights?{ROUTE}&sortBy=airline")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unknown sort key: airline");

        let (status, _) = get(app(), "/api/flights?originLocationCode=KUL").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn past_travel_dates_are_rejected() {
        let uri = "/api/flights?originLocationCode=KUL&destinationLocationCode=IKA\
                   &departureDate=2001-01-01&returnDate=2001-01-02";
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "departure date 2001-01-01 is in the past");

        let today = "/api/flights?originLocationCode=KUL&destinationLocationCode=IKA&departureDate=2025-05-20";
        let (status, _) = get(app(), today).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn blank_return_date_means_one_way() {
        let (status, body) = get(app(), &format!("/api/flights?{ROUTE}&returnDate=")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let client = AmadeusClient::new(AmadeusConfig::new("", "")).unwrap();
        let provider = FlightSource::Amadeus(Arc::new(CachedFlightProvider::new(
            client,
            &CacheConfig::default(),
        )));
        let app = create_router(state(provider), "data");

        let (status, body) = get(app, &format!("/api/flights?{ROUTE}")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    fn as_user(user: &str, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(USER_HEADER, user);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn bookmarks_require_a_user() {
        let (status, _) = get(app(), "/api/me/bookmarks").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = as_user("  ", "GET", "/api/me/bookmarks", None);
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bookmark_lifecycle() {
        let app = app();
        let body = serde_json::json!({
            "searchParams": ROUTE,
            "departureAt": "2025-05-21T09:00",
        });

        let request = as_user("alice", "POST", "/api/me/bookmarks", Some(body.clone()));
        let (status, saved) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(saved["userId"], "alice");
        assert_eq!(saved["departureAt"], "2025-05-21T09:00:00");
        assert_eq!(saved["createdAt"], "2025-05-20T12:00:00");
        let id = saved["id"].as_str().unwrap().to_string();

        let request = as_user("alice", "POST", "/api/me/bookmarks", Some(body));
        let (status, err) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(err["error"].as_str().unwrap().contains("already exists"));

        let request = as_user("alice", "GET", "/api/me/bookmarks", None);
        let (_, listed) = send(app.clone(), request).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let request = as_user("alice", "GET", "/api/me/bookmarks?departureAt=2025-05-22", None);
        let (_, listed) = send(app.clone(), request).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);

        let request = as_user("bob", "GET", "/api/me/bookmarks", None);
        let (_, listed) = send(app.clone(), request).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);

        let uri = format!("/api/me/bookmarks/{id}");
        let (status, _) = send(app.clone(), as_user("bob", "DELETE", &uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(app.clone(), as_user("alice", "DELETE", &uri, None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let request = as_user("alice", "GET", "/api/me/bookmarks", None);
        let (_, listed) = send(app, request).await;
        assert_eq!(listed.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn malformed_bookmarks_are_rejected() {
        let body = serde_json::json!({"searchParams": ROUTE, "departureAt": "soon"});
        let request = as_user("alice", "POST", "/api/me/bookmarks", Some(body));
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid departure time: soon");

        let body = serde_json::json!({"searchParams": " ", "departureAt": "2025-05-21"});
        let request = as_user("alice", "POST", "/api/me/bookmarks", Some(body));
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = as_user("alice", "GET", "/api/me/bookmarks?departureAt=later", None);
        let (status, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn serves_airport_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("airports_iata.json"), "[]").unwrap();

        let provider = FlightSource::Static(StaticFlightProvider::default());
        let app = create_router(state(provider), dir.path().to_str().unwrap());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/data/airports_iata.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
