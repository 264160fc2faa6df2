//! The Grapevine endpoint.
//!
//! One path serves every operation; the `GrapevineAction` header selects
//! between relaying a whisper and querying archived games.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use grapevine_core::error::DomainError;
use grapevine_core::whisper::Whisper;
use grapevine_relay::application::dispatcher::HopOutcome;
use grapevine_relay::application::query_handlers;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Header naming the requested operation.
pub const ACTION_HEADER: &str = "GrapevineAction";
/// Header carrying the game id when the query string does not.
pub const GAME_ID_HEADER: &str = "GameId";

/// Operations selectable through `GrapevineAction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Relay one whisper hop.
    Whisper,
    /// Fetch one archived game.
    Game,
    /// List every archived game.
    Games,
}

impl Action {
    /// Reads the action header. Matching ignores ASCII case and surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnknownAction` if the header is missing or names no
    /// known action.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let Some(value) = headers.get(ACTION_HEADER) else {
            return Err(ApiError::UnknownAction(None));
        };
        let raw = String::from_utf8_lossy(value.as_bytes());
        let raw = raw.trim();

        if raw.eq_ignore_ascii_case("whisper") {
            Ok(Self::Whisper)
        } else if raw.eq_ignore_ascii_case("game") {
            Ok(Self::Game)
        } else if raw.eq_ignore_ascii_case("games") {
            Ok(Self::Games)
        } else {
            Err(ApiError::UnknownAction(Some(raw.to_owned())))
        }
    }
}

/// Query parameters accepted by the endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct GrapevineQuery {
    /// Game to fetch for the `game` action.
    #[serde(rename = "gameId")]
    pub game_id: Option<String>,
}

/// Response body for an accepted whisper.
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    /// Always `"accepted"`.
    pub status: &'static str,
}

/// GET or POST /
#[instrument(skip_all, fields(correlation_id = %Uuid::new_v4()))]
async fn grapevine(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GrapevineQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let action = Action::from_headers(&headers)?;
    debug!(?action, "handling grapevine request");

    match action {
        Action::Whisper => {
            let whisper = parse_whisper(&body)?;
            accept_whisper(&state, whisper).await
        }
        Action::Game => {
            let game_id = requested_game_id(&query, &headers)?;
            let record = query_handlers::get_game(game_id, &state.games).await?;
            Ok(Json(record).into_response())
        }
        Action::Games => Ok(Json(query_handlers::list_games(&state.games).await).into_response()),
    }
}

fn parse_whisper(body: &[u8]) -> Result<Whisper, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| DomainError::Validation(format!("whisper body is not valid: {e}")).into())
}

/// Runs one hop. The response goes out as soon as the hop is planned; the
/// forward itself runs detached.
async fn accept_whisper(state: &AppState, whisper: Whisper) -> Result<Response, ApiError> {
    match state.dispatcher.dispatch(whisper).await? {
        HopOutcome::Relayed {
            kind, recipient, ..
        } => debug!(hop = %kind, recipient_id = recipient.id, "whisper relayed"),
        HopOutcome::Finalized(record) => debug!(game_id = record.game_id, "game finalized"),
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse { status: "accepted" }),
    )
        .into_response())
}

/// Game id from the query string, falling back to the `GameId` header.
fn requested_game_id(query: &GrapevineQuery, headers: &HeaderMap) -> Result<i64, DomainError> {
    let raw = query
        .game_id
        .clone()
        .or_else(|| {
            headers
                .get(GAME_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        })
        .ok_or_else(|| DomainError::Validation("gameId is required".to_string()))?;

    raw.trim()
        .parse()
        .map_err(|_| DomainError::Validation(format!("gameId must be an integer, got {raw:?}")))
}

/// Returns the router for the Grapevine endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(grapevine).post(grapevine))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use chrono::Utc;
    use grapevine_blob_store::memory_blob_store::InMemoryBlobStore;
    use grapevine_core::clock::Clock;
    use grapevine_core::rng::DeterministicRng;
    use grapevine_core::store::BlobStore;
    use grapevine_test_support::{
        FailingBlobStore, FixedClock, MockRng, NoRhymeLookup, RecordingWhisperSender,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::Timeouts;

    fn app_state_with(blobs: Arc<dyn BlobStore>) -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(Utc::now()));
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        AppState::new(
            clock,
            rng,
            blobs,
            Arc::new(NoRhymeLookup),
            Arc::new(RecordingWhisperSender::new()),
            Timeouts {
                rhyme_lookup: Duration::from_millis(100),
                delivery: Duration::from_millis(100),
            },
        )
    }

    fn test_app() -> Router {
        router().with_state(app_state_with(Arc::new(InMemoryBlobStore::new())))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_action_header_is_case_insensitive() {
        let action = Action::from_headers(&headers(&[("grapevineaction", " Whisper ")])).unwrap();

        assert_eq!(action, Action::Whisper);
    }

    #[test]
    fn test_missing_action_header_is_unknown_action() {
        let err = Action::from_headers(&HeaderMap::new()).unwrap_err();

        assert!(matches!(err, ApiError::UnknownAction(None)));
    }

    #[test]
    fn test_unrecognised_action_is_unknown_action() {
        let err = Action::from_headers(&headers(&[("grapevineaction", "shout")])).unwrap_err();

        assert!(matches!(err, ApiError::UnknownAction(Some(a)) if a == "shout"));
    }

    #[test]
    fn test_game_id_prefers_query_over_header() {
        let query = GrapevineQuery {
            game_id: Some("7".to_owned()),
        };

        let id = requested_game_id(&query, &headers(&[("gameid", "8")])).unwrap();

        assert_eq!(id, 7);
    }

    #[test]
    fn test_game_id_falls_back_to_header() {
        let id = requested_game_id(&GrapevineQuery::default(), &headers(&[("gameid", "8")]))
            .unwrap();

        assert_eq!(id, 8);
    }

    #[test]
    fn test_game_id_missing_or_non_numeric_is_validation_error() {
        let missing = requested_game_id(&GrapevineQuery::default(), &HeaderMap::new());
        let garbage = requested_game_id(
            &GrapevineQuery {
                game_id: Some("seven".to_owned()),
            },
            &HeaderMap::new(),
        );

        assert!(matches!(missing, Err(DomainError::Validation(_))));
        assert!(matches!(garbage, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_post_without_action_returns_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "unknown_action");
    }

    #[tokio::test]
    async fn test_whisper_with_invalid_json_returns_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(ACTION_HEADER, "whisper")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, json) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_game_unknown_id_returns_404() {
        let request = Request::builder()
            .method("GET")
            .uri("/?gameId=99")
            .header(ACTION_HEADER, "game")
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "game_not_found");
    }

    #[tokio::test]
    async fn test_games_with_failing_store_returns_empty_list() {
        let app = router().with_state(app_state_with(Arc::new(FailingBlobStore)));
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .header(ACTION_HEADER, "games")
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "games": [] }));
    }
}
