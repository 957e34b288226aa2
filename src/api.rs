//! REST API: events, registrations, stage submission, standings and player stats.
//!
//! Handlers are registered with [`configure`] so the binary and the tests mount
//! the same routes.

use crate::logic::{parse_placements_csv, submit_stage_results, write_standings_csv};
use crate::models::{Event, EventId, Participant, Placement, PlayerId, StageConfig, Standing};
use crate::stats::{refresh_player_stats, StatsStore};
use crate::store::{EventStore, StoreError};
use actix_web::{
    delete, get, post,
    web::{self, Data, Json, Path},
    HttpResponse, Responder,
};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state: the event store and the player statistics backend.
pub struct AppContext {
    pub events: EventStore,
    pub stats: Arc<dyn StatsStore>,
}

type AppState = Data<AppContext>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateEventBody {
    name: String,
    /// Explicit stage names/dates; takes precedence over `stage_count`.
    #[serde(default)]
    stages: Vec<StageConfig>,
    #[serde(default)]
    stage_count: Option<usize>,
    #[serde(default)]
    max_participants: Option<usize>,
}

#[derive(Deserialize)]
struct RegisterBody {
    player_name: String,
    /// Existing account id; a new one is generated when absent.
    #[serde(default)]
    player_id: Option<PlayerId>,
    #[serde(default)]
    membership_id: Option<String>,
}

#[derive(Deserialize)]
struct SubmitStageBody {
    placements: Vec<Placement>,
}

/// Path segment: event id (e.g. /api/events/{id})
#[derive(Deserialize)]
struct EventPath {
    id: EventId,
}

/// Path segments: event id and player id
#[derive(Deserialize)]
struct EventPlayerPath {
    id: EventId,
    player_id: PlayerId,
}

/// Path segments: event id and 1-based stage number
#[derive(Deserialize)]
struct EventStagePath {
    id: EventId,
    number: u32,
}

#[derive(Deserialize)]
struct PlayerPath {
    player_id: PlayerId,
}

fn error_json(msg: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": msg.to_string() })
}

/// Map a store error to a response: rejected changes are 400, unknown ids 404,
/// storage trouble 500.
fn store_error_response(e: StoreError) -> HttpResponse {
    match e {
        StoreError::NotFound(_) => HttpResponse::NotFound().json(error_json("No event")),
        StoreError::Event(e) => HttpResponse::BadRequest().json(error_json(e)),
        StoreError::Persistence(_) | StoreError::Lock => {
            log::error!("Event store failure: {}", e);
            HttpResponse::InternalServerError().json(error_json(e))
        }
    }
}

/// Run the stats refresh for a committed event in the background.
fn dispatch_stats_refresh(stats: Arc<dyn StatsStore>, event: Event) {
    actix_web::rt::spawn(async move {
        let summary = refresh_player_stats(stats.as_ref(), &event);
        if summary.failed > 0 {
            log::warn!(
                "Stats refresh for event {} finished with {} failure(s)",
                event.id,
                summary.failed
            );
        }
    });
}

/// Commit a stage submission, then kick off the stats refresh.
fn commit_stage(state: &AppState, id: EventId, placements: Vec<Placement>) -> HttpResponse {
    match state
        .events
        .update(id, |e| submit_stage_results(e, &placements))
    {
        Ok(event) => {
            dispatch_stats_refresh(state.stats.clone(), event.clone());
            HttpResponse::Ok().json(event)
        }
        Err(e) => store_error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "league-standings-web",
    })
}

/// Create an event with its stages (returns it with id).
#[post("/api/events")]
async fn api_create_event(state: AppState, body: Json<CreateEventBody>) -> HttpResponse {
    let body = body.into_inner();
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(error_json("Event name is required"));
    }
    let stages = if body.stages.is_empty() {
        StageConfig::defaults(body.stage_count.unwrap_or(1))
    } else {
        Ok(body.stages)
    };
    let event = match stages.and_then(|s| Event::new(name, s, body.max_participants)) {
        Ok(e) => e,
        Err(e) => return HttpResponse::BadRequest().json(error_json(e)),
    };
    match state.events.insert(event) {
        Ok(event) => {
            log::info!(
                "Created event {} ({}) with {} stage(s)",
                event.id,
                event.name,
                event.stages.len()
            );
            HttpResponse::Ok().json(event)
        }
        Err(e) => store_error_response(e),
    }
}

#[get("/api/events")]
async fn api_list_events(state: AppState) -> HttpResponse {
    match state.events.list() {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => store_error_response(e),
    }
}

#[get("/api/events/{id}")]
async fn api_get_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match state.events.get(path.id) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(e) => store_error_response(e),
    }
}

/// Delete a whole event, stages and standings included.
#[delete("/api/events/{id}")]
async fn api_delete_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match state.events.remove(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => store_error_response(e),
    }
}

/// Register a participant (any state but completed).
#[post("/api/events/{id}/participants")]
async fn api_register(
    state: AppState,
    path: Path<EventPath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut participant = match body.player_id {
        Some(id) => Participant::with_id(id, body.player_name),
        None => Participant::new(body.player_name),
    };
    if let Some(m) = body.membership_id.filter(|m| !m.trim().is_empty()) {
        participant = participant.with_membership_id(m.trim());
    }
    match state
        .events
        .update(path.id, |e| e.register_participant(participant))
    {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(e) => store_error_response(e),
    }
}

/// Drop a participant; they keep their past results.
#[post("/api/events/{id}/participants/{player_id}/drop")]
async fn api_drop(state: AppState, path: Path<EventPlayerPath>) -> HttpResponse {
    let player_id = path.player_id;
    match state
        .events
        .update(path.id, |e| e.drop_participant(player_id))
    {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(e) => store_error_response(e),
    }
}

/// Start the event (Upcoming -> Ongoing).
#[post("/api/events/{id}/start")]
async fn api_start(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match state.events.update(path.id, |e| e.start()) {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(e) => store_error_response(e),
    }
}

/// Submit the current stage's placements as JSON.
#[post("/api/events/{id}/stages/submit")]
async fn api_submit_stage(
    state: AppState,
    path: Path<EventPath>,
    body: Json<SubmitStageBody>,
) -> HttpResponse {
    commit_stage(&state, path.id, body.into_inner().placements)
}

/// Submit the current stage's placements as a CSV body.
#[post("/api/events/{id}/stages/submit-csv")]
async fn api_submit_stage_csv(state: AppState, path: Path<EventPath>, body: String) -> HttpResponse {
    match parse_placements_csv(body.as_bytes()) {
        Ok(placements) => commit_stage(&state, path.id, placements),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

/// Cumulative standings over all closed stages.
#[get("/api/events/{id}/standings")]
async fn api_standings(state: AppState, path: Path<EventPath>) -> HttpResponse {
    match state.events.get(path.id) {
        Ok(event) => HttpResponse::Ok().json(event.cumulative_standings),
        Err(e) => store_error_response(e),
    }
}

#[get("/api/events/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let event = match state.events.get(path.id) {
        Ok(e) => e,
        Err(e) => return store_error_response(e),
    };
    csv_response(&event.cumulative_standings)
}

/// Standings of one stage (empty until the stage is submitted).
#[get("/api/events/{id}/stages/{number}/standings")]
async fn api_stage_standings(state: AppState, path: Path<EventStagePath>) -> HttpResponse {
    let event = match state.events.get(path.id) {
        Ok(e) => e,
        Err(e) => return store_error_response(e),
    };
    match event.stages.into_iter().find(|s| s.number == path.number) {
        Some(stage) => HttpResponse::Ok().json(stage.standings),
        None => HttpResponse::NotFound().json(error_json("No stage")),
    }
}

#[get("/api/players/{player_id}/stats")]
async fn api_player_stats(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    match state.stats.profile(path.player_id) {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => HttpResponse::NotFound().json(error_json("No stats for player")),
        Err(e) => {
            log::error!("Stats lookup failed for {}: {}", path.player_id, e);
            HttpResponse::InternalServerError().json(error_json(e))
        }
    }
}

fn csv_response(standings: &[Standing]) -> HttpResponse {
    let mut out = Vec::new();
    match write_standings_csv(standings, &mut out) {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(out),
        Err(e) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

/// Mount every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_event)
        .service(api_list_events)
        .service(api_standings_csv)
        .service(api_standings)
        .service(api_get_event)
        .service(api_delete_event)
        .service(api_register)
        .service(api_drop)
        .service(api_start)
        .service(api_submit_stage)
        .service(api_submit_stage_csv)
        .service(api_stage_standings)
        .service(api_player_stats);
}
