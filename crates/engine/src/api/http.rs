//! HTTP routes.
//!
//! Thin JSON glue over the engine components. Handlers never hold state of
//! their own; every call is one synchronous operation on `App`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lorekeep_domain::{
    ChapterCompletion, ChapterOutcome, CharacterRecord, CombatAction, CombatId, CombatResult,
    CombatSession, LootOptions, LootResult, NarrativeDomainEvent, NarrativePhase,
    NarrativeSessionId, NarrativeState, NarrativeThread, PlayerContext, ThreadId,
    ThreadImportance, ThreadStatus,
};

use crate::app::App;
use crate::use_cases::combat::{ActionOutcome, CombatUiState, StartCombatOptions};
use crate::use_cases::narrative::{LootModifiers, NarrativeManager, ProgressReport};
use crate::use_cases::{CombatError, NarrativeError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/combats", post(start_combat))
        .route(
            "/api/combats/{id}",
            get(get_combat).delete(end_combat),
        )
        .route("/api/combats/{id}/actions", post(player_action))
        .route("/api/combats/{id}/enemy-turn", post(enemy_turn))
        .route("/api/combats/{id}/result", get(combat_result))
        .route("/api/loot/{enemy_id}", post(generate_loot))
        .route("/api/narratives", post(create_narrative))
        .route(
            "/api/narratives/{id}",
            get(get_narrative).delete(remove_narrative),
        )
        .route("/api/narratives/{id}/chapters", post(start_chapter))
        .route(
            "/api/narratives/{id}/chapters/complete",
            post(complete_chapter),
        )
        .route("/api/narratives/{id}/evaluate", post(evaluate_progress))
        .route("/api/narratives/{id}/actions", post(register_action))
        .route("/api/narratives/{id}/events", post(register_event))
        .route("/api/narratives/{id}/boss-defeated", post(boss_defeated))
        .route(
            "/api/narratives/{id}/objective-complete",
            post(objective_complete),
        )
        .route("/api/narratives/{id}/phase", post(force_phase))
        .route("/api/narratives/{id}/progress", post(advance_progress))
        .route("/api/narratives/{id}/threads", post(introduce_thread))
        .route(
            "/api/narratives/{id}/threads/{thread_id}",
            post(advance_thread),
        )
        .route(
            "/api/narratives/{id}/threads/{thread_id}/resolve",
            post(resolve_thread),
        )
        .route("/api/narratives/{id}/tension", post(change_tension))
        .route("/api/narratives/{id}/context", get(narrative_context))
        .route("/api/narratives/{id}/modifiers", get(narrative_modifiers))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Combat
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartCombatRequest {
    player: CharacterRecord,
    #[serde(flatten)]
    options: StartCombatOptions,
}

async fn start_combat(
    State(app): State<Arc<App>>,
    Json(request): Json<StartCombatRequest>,
) -> Result<(StatusCode, Json<CombatSession>), ApiError> {
    let session = app.combat.start_combat(&request.player, request.options)?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn get_combat(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CombatUiState>, ApiError> {
    let combat_id = CombatId::from_uuid(id);
    app.combat
        .get_combat_ui_state(combat_id)
        .map(Json)
        .ok_or_else(|| CombatError::NotFound(combat_id).into())
}

async fn end_combat(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let combat_id = CombatId::from_uuid(id);
    if app.combat.end_combat(combat_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CombatError::NotFound(combat_id).into())
    }
}

async fn player_action(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(action): Json<CombatAction>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let outcome = app
        .combat
        .execute_player_action(CombatId::from_uuid(id), action)?;
    Ok(Json(outcome))
}

async fn enemy_turn(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionOutcome>, ApiError> {
    let outcome = app.combat.execute_enemy_turn(CombatId::from_uuid(id))?;
    Ok(Json(outcome))
}

async fn combat_result(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CombatResult>, ApiError> {
    let combat_id = CombatId::from_uuid(id);
    if app.combat.get_session(combat_id).is_none() {
        return Err(CombatError::NotFound(combat_id).into());
    }
    app.combat
        .get_combat_result(combat_id)
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest("El combate sigue activo".to_string()))
}

// =============================================================================
// Loot
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LootRequest {
    #[serde(default)]
    experience: u32,
    #[serde(default)]
    options: LootOptions,
}

async fn generate_loot(
    State(app): State<Arc<App>>,
    Path(enemy_id): Path<String>,
    Json(request): Json<LootRequest>,
) -> Json<LootResult> {
    Json(
        app.loot
            .generate_loot(&enemy_id, request.experience, &request.options),
    )
}

// =============================================================================
// Narrative
// =============================================================================

/// Operation result plus the narrative events it produced, oldest first.
#[derive(Debug, Serialize)]
struct WithEvents<T> {
    data: T,
    events: Vec<NarrativeDomainEvent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedNarrative {
    session_id: NarrativeSessionId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StartChapterRequest {
    template_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompleteChapterRequest {
    outcome: ChapterOutcome,
}

#[derive(Debug, Deserialize)]
struct PlayerActionRequest {
    action: String,
}

#[derive(Debug, Deserialize)]
struct StoryEventRequest {
    event: String,
}

#[derive(Debug, Deserialize)]
struct ForcePhaseRequest {
    phase: NarrativePhase,
}

#[derive(Debug, Deserialize)]
struct ProgressRequest {
    amount: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressResponse {
    phase_progress: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntroduceThreadRequest {
    description: String,
    importance: ThreadImportance,
    #[serde(default)]
    related_quests: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ThreadStatusRequest {
    status: ThreadStatus,
}

/// Either a relative `delta` or an absolute `value`.
#[derive(Debug, Deserialize)]
struct TensionRequest {
    delta: Option<i32>,
    value: Option<i32>,
    reason: String,
}

enum TensionChange {
    Adjust(i32),
    Set(i32),
}

#[derive(Debug, Serialize)]
struct TensionResponse {
    tension: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NarrativeModifiers {
    combat_scaling: f64,
    loot: LootModifiers,
    suggested_quests: Vec<String>,
}

/// Run `f` on the session and collect the events it recorded.
fn with_events<T>(
    app: &App,
    id: Uuid,
    f: impl FnOnce(&mut NarrativeManager) -> Result<T, NarrativeError>,
) -> Result<Json<WithEvents<T>>, ApiError> {
    let envelope = app
        .narratives
        .with_session(NarrativeSessionId::from_uuid(id), |manager| {
            let data = f(&mut *manager)?;
            Ok(WithEvents {
                data,
                events: manager.drain_events(),
            })
        })?;
    Ok(Json(envelope))
}

async fn create_narrative(
    State(app): State<Arc<App>>,
    Json(player): Json<PlayerContext>,
) -> Result<(StatusCode, Json<CreatedNarrative>), ApiError> {
    let session_id = app.narratives.create(player)?;
    Ok((StatusCode::CREATED, Json(CreatedNarrative { session_id })))
}

async fn get_narrative(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<NarrativeState>>, ApiError> {
    let state = app
        .narratives
        .with_session(NarrativeSessionId::from_uuid(id), |manager| {
            Ok(manager.get_state().cloned())
        })?;
    Ok(Json(state))
}

async fn remove_narrative(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let session_id = NarrativeSessionId::from_uuid(id);
    if app.narratives.remove(session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(NarrativeError::SessionNotFound(session_id).into())
    }
}

async fn start_chapter(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<StartChapterRequest>,
) -> Result<Json<WithEvents<NarrativeState>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.start_new_chapter(request.template_id.as_deref())
    })
}

async fn complete_chapter(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteChapterRequest>,
) -> Result<Json<WithEvents<ChapterCompletion>>, ApiError> {
    with_events(&app, id, |manager| manager.complete_chapter(request.outcome))
}

async fn evaluate_progress(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithEvents<ProgressReport>>, ApiError> {
    with_events(&app, id, NarrativeManager::evaluate_progress)
}

async fn register_action(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<PlayerActionRequest>,
) -> Result<Json<WithEvents<NarrativeState>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.register_player_action(&request.action)
    })
}

/// State after a mutation that has no result of its own.
fn current_state(manager: &NarrativeManager) -> Result<NarrativeState, NarrativeError> {
    manager
        .get_state()
        .cloned()
        .ok_or(NarrativeError::NoActiveChapter)
}

async fn register_event(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<StoryEventRequest>,
) -> Result<Json<WithEvents<NarrativeState>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.register_event(&request.event)?;
        current_state(manager)
    })
}

async fn boss_defeated(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithEvents<NarrativeState>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.register_boss_defeated()?;
        current_state(manager)
    })
}

async fn objective_complete(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WithEvents<NarrativeState>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.register_main_objective_complete()?;
        current_state(manager)
    })
}

async fn force_phase(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ForcePhaseRequest>,
) -> Result<Json<WithEvents<NarrativeState>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.force_phase_transition(request.phase)
    })
}

async fn advance_progress(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<WithEvents<ProgressResponse>>, ApiError> {
    with_events(&app, id, |manager| {
        let phase_progress = manager.advance_phase_progress(request.amount)?;
        Ok(ProgressResponse { phase_progress })
    })
}

async fn introduce_thread(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<IntroduceThreadRequest>,
) -> Result<(StatusCode, Json<WithEvents<NarrativeThread>>), ApiError> {
    let IntroduceThreadRequest {
        description,
        importance,
        related_quests,
    } = request;
    let thread = with_events(&app, id, |manager| {
        manager.introduce_thread(description, importance, related_quests)
    })?;
    Ok((StatusCode::CREATED, thread))
}

async fn advance_thread(
    State(app): State<Arc<App>>,
    Path((id, thread_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ThreadStatusRequest>,
) -> Result<Json<WithEvents<NarrativeThread>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.advance_thread(ThreadId::from_uuid(thread_id), request.status)
    })
}

async fn resolve_thread(
    State(app): State<Arc<App>>,
    Path((id, thread_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<WithEvents<NarrativeThread>>, ApiError> {
    with_events(&app, id, |manager| {
        manager.resolve_thread(ThreadId::from_uuid(thread_id))
    })
}

async fn change_tension(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<TensionRequest>,
) -> Result<Json<WithEvents<TensionResponse>>, ApiError> {
    let TensionRequest {
        delta,
        value,
        reason,
    } = request;
    let change = match (delta, value) {
        (Some(delta), None) => TensionChange::Adjust(delta),
        (None, Some(value)) => TensionChange::Set(value),
        _ => {
            return Err(ApiError::BadRequest(
                "Indica exactamente uno de delta o value".to_string(),
            ))
        }
    };

    with_events(&app, id, |manager| {
        let tension = match change {
            TensionChange::Adjust(delta) => manager.adjust_tension(delta, &reason)?,
            TensionChange::Set(value) => manager.set_tension(value, &reason)?,
        };
        Ok(TensionResponse { tension })
    })
}

async fn narrative_context(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<String, ApiError> {
    let context = app
        .narratives
        .with_session(NarrativeSessionId::from_uuid(id), |manager| {
            manager.generate_narrative_context()
        })?;
    Ok(context)
}

async fn narrative_modifiers(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<NarrativeModifiers>, ApiError> {
    let modifiers = app
        .narratives
        .with_session(NarrativeSessionId::from_uuid(id), |manager| {
            Ok(NarrativeModifiers {
                combat_scaling: manager.get_combat_scaling(),
                loot: manager.get_loot_modifiers(),
                suggested_quests: manager.get_suggested_quests(),
            })
        })?;
    Ok(Json(modifiers))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}

impl From<CombatError> for ApiError {
    fn from(e: CombatError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound(e.to_string())
        } else {
            ApiError::BadRequest(e.to_string())
        }
    }
}

impl From<NarrativeError> for ApiError {
    fn from(e: NarrativeError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound(e.to_string())
        } else {
            ApiError::BadRequest(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::infrastructure::clock::{FixedRandom, SystemClock};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router(random: FixedRandom) -> Router {
        let app = App::with_ports(
            EngineConfig::default(),
            Arc::new(SystemClock::new()),
            Arc::new(random),
        );
        routes().with_state(Arc::new(app))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(router, method, uri, body).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn player() -> Value {
        json!({
            "id": "pc-1",
            "name": "Aria",
            "level": 1,
            "currentHp": 100,
            "maxHp": 100,
            "currentStamina": 50,
            "maxStamina": 50,
            "currentMana": 30,
            "maxMana": 30,
            "attributes": {
                "strength": 10,
                "dexterity": 10,
                "constitution": 10,
                "intelligence": 10,
                "wisdom": 10,
                "charisma": 10,
                "luck": 10
            }
        })
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = send(&router(FixedRandom(0.5, 10)), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn combat_lifecycle() {
        let router = router(FixedRandom(0.9, 10));
        let (status, session) = send_json(
            &router,
            "POST",
            "/api/combats",
            Some(json!({ "player": player(), "enemyIds": ["goblin"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(session["isActive"], true);
        let id = session["id"].as_str().unwrap().to_string();

        // the goblin's dexterity wins a tied roll
        assert_eq!(session["phase"], "ENEMY_TURN");
        let (status, message) = send(
            &router,
            "POST",
            &format!("/api/combats/{id}/actions"),
            Some(json!({ "type": "ATTACK", "actorId": "pc-1", "targetId": "enemy_0_goblin" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "No es el turno del jugador".as_bytes());

        let (status, outcome) =
            send_json(&router, "POST", &format!("/api/combats/{id}/enemy-turn"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["session"]["phase"], "PLAYER_TURN");

        let (status, ui) = send_json(&router, "GET", &format!("/api/combats/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ui["isPlayerTurn"], true);

        let (status, _) = send(&router, "GET", &format!("/api/combats/{id}/result"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "DELETE", &format!("/api/combats/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&router, "GET", &format!("/api/combats/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_combat_is_not_found() {
        let router = router(FixedRandom(0.5, 10));
        let id = Uuid::new_v4();
        let (status, _) =
            send(&router, "POST", &format!("/api/combats/{id}/enemy-turn"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn loot_for_unknown_enemy_is_empty() {
        let router = router(FixedRandom(0.5, 10));
        let (status, loot) = send_json(
            &router,
            "POST",
            "/api/loot/dragon",
            Some(json!({ "experience": 40 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loot["gold"], 0);
        assert_eq!(loot["experienceGained"], 40);
        assert_eq!(loot["description"], "No se encontró nada de valor.");
    }

    #[tokio::test]
    async fn narrative_flow() {
        let router = router(FixedRandom(0.9, 0));
        let (status, created) =
            send_json(&router, "POST", "/api/narratives", Some(json!({ "level": 1 }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["sessionId"].as_str().unwrap().to_string();

        let (status, started) = send_json(
            &router,
            "POST",
            &format!("/api/narratives/{id}/chapters"),
            Some(json!({ "templateId": "tutorial" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(started["data"]["phase"], "HOOK");
        assert_eq!(started["events"][0]["type"], "CHAPTER_STARTED");

        send(
            &router,
            "POST",
            &format!("/api/narratives/{id}/actions"),
            Some(json!({ "action": "accepted_quest" })),
        )
        .await;
        let (status, report) =
            send_json(&router, "POST", &format!("/api/narratives/{id}/evaluate"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["data"]["transitionedTo"], "DEVELOPMENT");
        assert_eq!(report["events"][0]["type"], "PHASE_CHANGED");

        let (status, context) =
            send(&router, "GET", &format!("/api/narratives/{id}/context"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(context).unwrap().contains("Fase: Desarrollo"));

        let (_, modifiers) =
            send_json(&router, "GET", &format!("/api/narratives/{id}/modifiers"), None).await;
        assert_eq!(modifiers["loot"]["uniqueDropChance"], 0.02);

        let (status, completion) = send_json(
            &router,
            "POST",
            &format!("/api/narratives/{id}/chapters/complete"),
            Some(json!({ "outcome": "VICTORY" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(completion["data"]["rewards"]["experience"], 100);

        let (status, message) =
            send(&router, "POST", &format!("/api/narratives/{id}/evaluate"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "No hay un capítulo activo".as_bytes());
    }

    #[tokio::test]
    async fn chapter_reaches_resolution_over_http() {
        let router = router(FixedRandom(0.9, 0));
        let (_, created) =
            send_json(&router, "POST", "/api/narratives", Some(json!({ "level": 1 }))).await;
        let id = created["sessionId"].as_str().unwrap().to_string();
        let base = format!("/api/narratives/{id}");
        send(
            &router,
            "POST",
            &format!("{base}/chapters"),
            Some(json!({ "templateId": "tutorial" })),
        )
        .await;

        // 80% of HOOK is 12% of the chapter
        let (status, progress) = send_json(
            &router,
            "POST",
            &format!("{base}/progress"),
            Some(json!({ "amount": 80.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress["data"]["phaseProgress"], 80.0);
        let (_, report) = send_json(&router, "POST", &format!("{base}/evaluate"), None).await;
        assert_eq!(report["data"]["transitionedTo"], "DEVELOPMENT");

        let (status, thread) = send_json(
            &router,
            "POST",
            &format!("{base}/threads"),
            Some(json!({
                "description": "Descubrir quién guía a los goblins",
                "importance": "MAIN",
                "relatedQuests": ["q_goblin_leader"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(thread["data"]["status"], "INTRODUCED");
        assert_eq!(thread["events"][0]["type"], "THREAD_INTRODUCED");
        let thread_id = thread["data"]["id"].as_str().unwrap().to_string();

        let (status, ready) = send_json(
            &router,
            "POST",
            &format!("{base}/threads/{thread_id}"),
            Some(json!({ "status": "READY_FOR_RESOLUTION" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ready["data"]["status"], "READY_FOR_RESOLUTION");
        assert_eq!(ready["events"][0]["type"], "THREAD_UPDATED");

        let (status, _) = send(
            &router,
            "POST",
            &format!("{base}/events"),
            Some(json!({ "event": "climax_ready" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (_, report) = send_json(&router, "POST", &format!("{base}/evaluate"), None).await;
        assert_eq!(report["data"]["transitionedTo"], "CLIMAX");

        let (_, report) = send_json(&router, "POST", &format!("{base}/evaluate"), None).await;
        assert!(report["data"]["transitionedTo"].is_null());
        let (status, _) = send(&router, "POST", &format!("{base}/boss-defeated"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, report) = send_json(&router, "POST", &format!("{base}/evaluate"), None).await;
        assert_eq!(report["data"]["transitionedTo"], "RESOLUTION");

        let (status, resolved) = send_json(
            &router,
            "POST",
            &format!("{base}/threads/{thread_id}/resolve"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resolved["data"]["status"], "RESOLVED");

        let (_, state) = send_json(&router, "GET", &base, None).await;
        assert_eq!(state["phase"], "RESOLUTION");
        let (_, modifiers) = send_json(&router, "GET", &format!("{base}/modifiers"), None).await;
        assert_eq!(modifiers["loot"]["qualityBonus"], 0.3);

        let missing = Uuid::new_v4();
        let (status, _) = send(
            &router,
            "POST",
            &format!("{base}/threads/{missing}/resolve"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn forced_phase_and_objective_complete() {
        let router = router(FixedRandom(0.9, 0));
        let (_, created) = send_json(&router, "POST", "/api/narratives", Some(json!({}))).await;
        let id = created["sessionId"].as_str().unwrap().to_string();
        let base = format!("/api/narratives/{id}");

        // no chapter yet
        let (status, message) =
            send(&router, "POST", &format!("{base}/objective-complete"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "No hay un capítulo activo".as_bytes());

        send(
            &router,
            "POST",
            &format!("{base}/chapters"),
            Some(json!({ "templateId": "tutorial" })),
        )
        .await;
        let (status, forced) = send_json(
            &router,
            "POST",
            &format!("{base}/phase"),
            Some(json!({ "phase": "CLIMAX" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(forced["data"]["phase"], "CLIMAX");
        assert_eq!(forced["events"][0]["type"], "PHASE_CHANGED");

        let (status, _) = send(&router, "POST", &format!("{base}/objective-complete"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, report) = send_json(&router, "POST", &format!("{base}/evaluate"), None).await;
        assert_eq!(report["data"]["transitionedTo"], "RESOLUTION");

        let (status, _) = send(
            &router,
            "POST",
            &format!("{base}/phase"),
            Some(json!({ "phase": "FINALE" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn tension_needs_exactly_one_mode() {
        let router = router(FixedRandom(0.9, 0));
        let (_, created) = send_json(&router, "POST", "/api/narratives", Some(json!({}))).await;
        let id = created["sessionId"].as_str().unwrap().to_string();
        send(
            &router,
            "POST",
            &format!("/api/narratives/{id}/chapters"),
            Some(json!({})),
        )
        .await;

        let uri = format!("/api/narratives/{id}/tension");
        let (status, _) = send(&router, "POST", &uri, Some(json!({ "reason": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send_json(
            &router,
            "POST",
            &uri,
            Some(json!({ "value": 250, "reason": "prueba" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tension"], 100);
    }

    #[tokio::test]
    async fn unknown_narrative_is_not_found() {
        let router = router(FixedRandom(0.9, 0));
        let id = Uuid::new_v4();
        let (status, _) =
            send(&router, "POST", &format!("/api/narratives/{id}/evaluate"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&router, "DELETE", &format!("/api/narratives/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
