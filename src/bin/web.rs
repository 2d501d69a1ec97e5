//! Single binary web server: tournament registration, brackets and match reporting via REST.
//! Run with: cargo run --bin web
//! Configured from the environment (HOST, PORT, APP_ENV, SESSION_SECRET, AUTH_SERVICE_TOKEN,
//! FINISHED_RETENTION_HOURS).

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use dota_tournament_web::config::Environment;
use dota_tournament_web::logic::{
    advance_tournament_bye, can_report, create_lobby, generate_tournament_bracket,
    record_tournament_game, record_tournament_result, regenerate_bracket, register_team,
    start_tournament_match,
};
use dota_tournament_web::{
    Config, MatchId, MatchRules, MatchStatus, SeedingStrategy, TeamId, TeamRoster, Tournament,
    TournamentError, TournamentId, TournamentSchedule, TournamentStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use uuid::Uuid;

/// In-memory store of tournaments by id. Every mutation holds the write lock, so
/// results for one bracket are applied one at a time.
type AppState = Data<RwLock<HashMap<TournamentId, Tournament>>>;

/// Session keys.
const STEAM_ID_KEY: &str = "steam_id";
const USER_ID_KEY: &str = "user_id";

/// Header carrying the auth service's shared token.
const AUTH_TOKEN_HEADER: &str = "X-Auth-Service-Token";

const DEFAULT_MAX_TEAMS: usize = 16;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    timestamp: DateTime<Utc>,
}

/// Tournament plus whether it currently accepts registrations.
#[derive(Serialize)]
struct TournamentSummary<'a> {
    #[serde(flatten)]
    tournament: &'a Tournament,
    can_register: bool,
}

impl<'a> TournamentSummary<'a> {
    fn new(tournament: &'a Tournament) -> Self {
        Self {
            tournament,
            can_register: tournament.can_register(),
        }
    }
}

/// Identity established by the auth service; this server only stores it in the session cookie.
#[derive(Deserialize)]
struct SessionBody {
    user_id: Uuid,
    steam_id: String,
}

#[derive(Deserialize)]
struct ListQuery {
    status: Option<TournamentStatus>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    description: String,
    max_teams: Option<usize>,
    registration_end: DateTime<Utc>,
    tournament_start: DateTime<Utc>,
    /// Keep the tournament in `draft` instead of opening registration right away.
    #[serde(default)]
    draft: bool,
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    roster: TeamRoster,
}

#[derive(Deserialize)]
struct MatchResultBody {
    winner_id: Option<TeamId>,
    status: Option<MatchStatus>,
}

#[derive(Deserialize)]
struct GameResultBody {
    winner_id: TeamId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

/// Path segments: tournament id and team id (e.g. /api/tournaments/{id}/teams/{team_id})
#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::NotCaptain => HttpResponse::Forbidden().json(body),
        e if e.is_not_found() => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({ "error": message }))
}

/// Steam id of the signed-in caller, or a 401 response.
fn require_steam_id(session: &Session) -> Result<String, HttpResponse> {
    match session.get::<String>(STEAM_ID_KEY) {
        Ok(Some(steam_id)) => Ok(steam_id),
        _ => Err(HttpResponse::Unauthorized()
            .json(serde_json::json!({ "error": "Authorization required" }))),
    }
}

fn require_user_id(session: &Session) -> Result<Uuid, HttpResponse> {
    match session.get::<Uuid>(USER_ID_KEY) {
        Ok(Some(user_id)) => Ok(user_id),
        _ => Err(HttpResponse::Unauthorized()
            .json(serde_json::json!({ "error": "Authorization required" }))),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dota-tournament-web",
        timestamp: Utc::now(),
    })
}

/// Store the caller's identity in the session cookie. Only the auth service may do
/// this; it proves itself with the shared token header.
#[post("/api/session")]
async fn api_create_session(
    req: HttpRequest,
    config: Data<Config>,
    session: Session,
    body: Json<SessionBody>,
) -> HttpResponse {
    let token = req
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if !config.accepts_auth_token(token) {
        log::warn!("Rejected session request without a valid auth service token");
        return forbidden("Sessions are opened by the auth service only");
    }
    let body = body.into_inner();
    if session.insert(USER_ID_KEY, body.user_id).is_err()
        || session.insert(STEAM_ID_KEY, &body.steam_id).is_err()
    {
        return HttpResponse::InternalServerError().body("session error");
    }
    session.renew();
    log::info!("Session opened for {}", body.steam_id);
    HttpResponse::Ok().json(serde_json::json!({ "steam_id": body.steam_id }))
}

#[delete("/api/session")]
async fn api_delete_session(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// List tournaments, optionally filtered by status.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, query: Query<ListQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let mut tournaments: Vec<_> = g
        .values()
        .filter(|t| query.status.map_or(true, |s| t.status == s))
        .collect();
    tournaments.sort_by_key(|t| t.created_at);
    let summaries: Vec<_> = tournaments.into_iter().map(TournamentSummary::new).collect();
    HttpResponse::Ok().json(summaries)
}

/// Create a tournament organized by the signed-in caller.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    session: Session,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let body = body.into_inner();
    if body.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut tournament = Tournament::new(
        body.name.trim(),
        body.description,
        steam_id,
        body.max_teams.unwrap_or(DEFAULT_MAX_TEAMS),
        TournamentSchedule::new(body.registration_end, body.tournament_start),
    );
    if !body.draft {
        if let Err(e) = tournament.open_registration() {
            return error_response(&e);
        }
    }
    let id = tournament.id;
    log::info!("Tournament created: {} ({})", tournament.name, id);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = g.entry(id).or_insert(tournament);
    HttpResponse::Created().json(TournamentSummary::new(t))
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(TournamentSummary::new(t)),
        None => no_tournament(),
    }
}

/// Open registration for a draft tournament (organizer only).
#[post("/api/tournaments/{id}/open-registration")]
async fn api_open_registration(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can open registration");
    }
    match t.open_registration() {
        Ok(()) => HttpResponse::Ok().json(TournamentSummary::new(t)),
        Err(e) => error_response(&e),
    }
}

/// Register a team; the caller must be its captain.
#[post("/api/tournaments/{id}/register")]
async fn api_register_team(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<RegisterTeamBody>,
) -> HttpResponse {
    let user_id = match require_user_id(&session) {
        Ok(u) => u,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match register_team(t, &body.roster, user_id) {
        Ok(team_id) => HttpResponse::Created().json(serde_json::json!({
            "team": t.get_team(team_id),
            "tournament": TournamentSummary::new(t),
        })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/teams")]
async fn api_list_teams(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(&t.teams),
        None => no_tournament(),
    }
}

/// Withdraw a team during registration (its captain or the organizer).
#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_withdraw_team(
    state: AppState,
    session: Session,
    path: Path<TournamentTeamPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    let is_captain = t
        .get_team(path.team_id)
        .is_some_and(|team| team.captain_id == steam_id);
    if !is_captain && !t.is_organizer(&steam_id) {
        return forbidden("Only the team captain or the organizer can withdraw a team");
    }
    match t.withdraw_team(path.team_id) {
        Ok(_) => HttpResponse::Ok().json(TournamentSummary::new(t)),
        Err(e) => error_response(&e),
    }
}

/// Disqualify a team during registration (organizer only). The team stays listed.
#[post("/api/tournaments/{id}/teams/{team_id}/disqualify")]
async fn api_disqualify_team(
    state: AppState,
    session: Session,
    path: Path<TournamentTeamPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can disqualify a team");
    }
    match t.disqualify_team(path.team_id) {
        Ok(team) => {
            log::info!("Team {} disqualified", team.name);
            HttpResponse::Ok().json(team)
        }
        Err(e) => error_response(&e),
    }
}

/// Replace the series policy before the bracket exists (organizer only).
#[put("/api/tournaments/{id}/match-rules")]
async fn api_set_match_rules(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<MatchRules>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can change match rules");
    }
    match t.set_match_rules(body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(TournamentSummary::new(t)),
        Err(e) => error_response(&e),
    }
}

/// Replace the seeding strategy before the bracket exists (organizer only).
#[put("/api/tournaments/{id}/seeding")]
async fn api_set_seeding(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
    body: Json<SeedingStrategy>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can change seeding");
    }
    match t.set_seeding(body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(TournamentSummary::new(t)),
        Err(e) => error_response(&e),
    }
}

/// Close registration and generate the bracket (organizer only).
#[post("/api/tournaments/{id}/generate-bracket")]
async fn api_generate_bracket(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can generate the bracket");
    }
    match generate_tournament_bracket(t) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "bracket": &t.bracket,
            "tournament": TournamentSummary::new(t),
        })),
        Err(e) => error_response(&e),
    }
}

/// Throw away an untouched bracket and draw a new one (organizer only).
#[post("/api/tournaments/{id}/regenerate-bracket")]
async fn api_regenerate_bracket(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can regenerate the bracket");
    }
    match regenerate_bracket(t) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "bracket": &t.bracket })),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match &t.bracket {
        Some(bracket) => HttpResponse::Ok().json(serde_json::json!({ "bracket": bracket })),
        None => HttpResponse::Ok().json(serde_json::json!({
            "bracket": null,
            "message": "Bracket not generated yet",
        })),
    }
}

#[get("/api/tournaments/{id}/matches/{match_id}")]
async fn api_get_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    let found = t.bracket().and_then(|b| {
        b.get_match(path.match_id)
            .ok_or(TournamentError::MatchNotFound(path.match_id))
    });
    match found {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Report a match result (captain of a seated team, or the organizer).
#[put("/api/tournaments/{id}/matches/{match_id}")]
async fn api_update_match(
    state: AppState,
    session: Session,
    path: Path<TournamentMatchPath>,
    body: Json<MatchResultBody>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !can_report(t, path.match_id, &steam_id) {
        return forbidden("Only a captain of this match or the organizer can report results");
    }
    match record_tournament_result(t, path.match_id, body.winner_id, body.status) {
        Ok(m) => HttpResponse::Ok().json(serde_json::json!({
            "match": m,
            "bracket": &t.bracket,
            "tournament_status": t.status,
        })),
        Err(e) => error_response(&e),
    }
}

/// Mark a seated match as ongoing (captain of a seated team, or the organizer).
#[post("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(
    state: AppState,
    session: Session,
    path: Path<TournamentMatchPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !can_report(t, path.match_id, &steam_id) {
        return forbidden("Only a captain of this match or the organizer can start it");
    }
    match start_tournament_match(t, path.match_id) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Report one game of a series (captain of a seated team, or the organizer).
#[post("/api/tournaments/{id}/matches/{match_id}/games")]
async fn api_record_game(
    state: AppState,
    session: Session,
    path: Path<TournamentMatchPath>,
    body: Json<GameResultBody>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !can_report(t, path.match_id, &steam_id) {
        return forbidden("Only a captain of this match or the organizer can report games");
    }
    match record_tournament_game(t, path.match_id, body.winner_id) {
        Ok(m) => HttpResponse::Ok().json(serde_json::json!({
            "match": m,
            "tournament_status": t.status,
        })),
        Err(e) => error_response(&e),
    }
}

/// Push the lone team of a bye into the next round (organizer only).
#[post("/api/tournaments/{id}/matches/{match_id}/advance-bye")]
async fn api_advance_bye(
    state: AppState,
    session: Session,
    path: Path<TournamentMatchPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can advance a bye");
    }
    match advance_tournament_bye(t, path.match_id) {
        Ok(m) => HttpResponse::Ok().json(serde_json::json!({
            "match": m,
            "bracket": &t.bracket,
        })),
        Err(e) => error_response(&e),
    }
}

/// Lobby name, password and steps for a captain of the match.
#[post("/api/tournaments/{id}/matches/{match_id}/create-lobby")]
async fn api_create_lobby(
    state: AppState,
    session: Session,
    path: Path<TournamentMatchPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    match create_lobby(t, path.match_id, &steam_id) {
        Ok(lobby) => HttpResponse::Ok().json(serde_json::json!({ "lobby": lobby })),
        Err(e) => error_response(&e),
    }
}

/// Cancel a tournament that has not finished (organizer only).
#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel_tournament(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let steam_id = match require_steam_id(&session) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match g.get_mut(&path.id) {
        Some(t) => t,
        None => return no_tournament(),
    };
    if !t.is_organizer(&steam_id) {
        return forbidden("Only the organizer can cancel the tournament");
    }
    match t.cancel() {
        Ok(()) => HttpResponse::Ok().json(TournamentSummary::new(t)),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let session_key = match &config.session_secret {
        Some(secret) => Key::derive_from(secret.as_bytes()),
        None => {
            log::warn!("SESSION_SECRET not set, sessions will not survive a restart");
            Key::generate()
        }
    };
    let secure_cookies = config.environment == Environment::Production;
    if config.auth_service_token.is_none() {
        log::warn!("AUTH_SERVICE_TOKEN not set, any caller can open a session");
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, Tournament>::new()));

    // Background task: every 30 minutes, drop finished tournaments past the retention period
    let state_cleanup = state.clone();
    let retention = config.finished_retention;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let now = Utc::now();
            let before = g.len();
            g.retain(|_, t| !t.is_expired(now, retention));
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} finished tournament(s)", removed);
            }
        }
    });
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_create_session)
            .service(api_delete_session)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_open_registration)
            .service(api_register_team)
            .service(api_list_teams)
            .service(api_withdraw_team)
            .service(api_disqualify_team)
            .service(api_set_match_rules)
            .service(api_set_seeding)
            .service(api_generate_bracket)
            .service(api_regenerate_bracket)
            .service(api_get_bracket)
            .service(api_get_match)
            .service(api_update_match)
            .service(api_start_match)
            .service(api_record_game)
            .service(api_advance_bye)
            .service(api_create_lobby)
            .service(api_cancel_tournament)
    })
    .bind(bind)?
    .run()
    .await
}
