//! Single binary web server: JSON API over the club's leagues, matches and standings.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Other env: ADMIN_TOKEN (enables admin sign-in), DATA_FILE (JSON persistence),
//! STATIC_DIR, SESSION_KEY (64+ bytes), COOKIE_SECURE, PLAYERS_PER_GROUP.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use club_ranking_web::{
    describe_match, history_csv, models::with_ranks, standings_csv, store::persist, Access,
    Change, League, LeagueId, Match, MatchId, NewMatch, RankedStat, RosterStore, ScoringRules,
    Settings, StandingsBoard, StoreError, Winner,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;

/// Session key holding the admin flag.
const ADMIN_SESSION_KEY: &str = "admin";

/// Store, computed standings and where to persist them.
struct Club {
    store: RosterStore,
    board: StandingsBoard,
    data_file: Option<PathBuf>,
}

impl Club {
    fn new(store: RosterStore, data_file: Option<PathBuf>) -> Self {
        let board = StandingsBoard::build(&store);
        Self {
            store,
            board,
            data_file,
        }
    }

    /// After a successful mutation: recompute affected standings, then persist.
    ///
    /// The save is synchronous and runs under the write lock, so writes reach the file
    /// in the order they were applied. The file holds one club (a few leagues and their
    /// match history); move this to `web::block` behind a save queue if it grows large.
    fn commit(&mut self, change: &Change) {
        self.board.apply(&self.store, change);
        if let Some(path) = &self.data_file {
            if let Err(e) = persist::save(path, &self.store) {
                log::error!("Failed to save data file {}: {}", path.display(), e);
            }
        }
    }

    fn league_standings(&self, league: &League) -> LeagueStandings {
        let rows = self
            .board
            .standings(league.id)
            .map(with_ranks)
            .unwrap_or_default();
        LeagueStandings {
            league_id: league.id,
            name: league.name.clone(),
            rows,
        }
    }
}

type AppState = Data<RwLock<Club>>;

/// Settings read once at startup.
struct ServerConfig {
    admin_token: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct SessionResponse {
    admin: bool,
}

#[derive(Serialize)]
struct LeagueStandings {
    league_id: LeagueId,
    name: String,
    rows: Vec<RankedStat>,
}

#[derive(Serialize)]
struct MatchView<'a> {
    #[serde(flatten)]
    record: &'a Match,
    league_name: &'a str,
    description: String,
}

#[derive(Deserialize)]
struct SignInBody {
    token: String,
}

#[derive(Deserialize)]
struct CreateLeagueBody {
    name: String,
    players: Vec<String>,
}

#[derive(Deserialize)]
struct UpdateLeagueBody {
    name: Option<String>,
    players: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RecordMatchBody {
    league_id: LeagueId,
    player1: usize,
    player2: usize,
    winner: Winner,
}

#[derive(Deserialize)]
struct MatchDateBody {
    date: DateTime<Utc>,
}

#[derive(Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScoringPreset {
    Standard,
    Legacy,
}

/// Either a preset name or a full point table.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScoringChoice {
    Preset(ScoringPreset),
    Table(ScoringRules),
}

impl ScoringChoice {
    fn rules(&self) -> ScoringRules {
        match self {
            ScoringChoice::Preset(ScoringPreset::Standard) => ScoringRules::STANDARD,
            ScoringChoice::Preset(ScoringPreset::Legacy) => ScoringRules::LEGACY,
            ScoringChoice::Table(rules) => *rules,
        }
    }
}

#[derive(Deserialize)]
struct UpdateSettingsBody {
    players_per_group: Option<u8>,
    scoring: Option<ScoringChoice>,
}

/// Query: optional league filter (e.g. /api/matches?league={id})
#[derive(Deserialize)]
struct HistoryQuery {
    league: Option<LeagueId>,
}

/// Path segment: league id (e.g. /api/leagues/{id})
#[derive(Deserialize)]
struct LeaguePath {
    id: LeagueId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn access(session: &Session) -> Access {
    match session.get::<bool>(ADMIN_SESSION_KEY) {
        Ok(Some(true)) => Access::Admin,
        _ => Access::Viewer,
    }
}

fn error_response(e: &StoreError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        StoreError::PermissionDenied => HttpResponse::Forbidden().json(body),
        StoreError::LeagueNotFound(_) | StoreError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn csv_response(csv: Result<String, club_ranking_web::ExportError>) -> HttpResponse {
    match csv {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "club-ranking-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Whether the current session holds the admin capability.
#[get("/api/session")]
async fn api_get_session(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        admin: access(&session) == Access::Admin,
    })
}

/// Sign in as admin with the configured token.
#[post("/api/session")]
async fn api_sign_in(
    config: Data<ServerConfig>,
    session: Session,
    body: Json<SignInBody>,
) -> HttpResponse {
    let accepted = matches!(&config.admin_token, Some(token) if *token == body.token);
    if !accepted {
        log::warn!("Rejected admin sign-in");
        return error_response(&StoreError::PermissionDenied);
    }
    if let Err(e) = session.insert(ADMIN_SESSION_KEY, true) {
        log::error!("Could not write session: {}", e);
        return HttpResponse::InternalServerError().body("session error");
    }
    session.renew();
    log::info!("Admin signed in");
    HttpResponse::Ok().json(SessionResponse { admin: true })
}

#[delete("/api/session")]
async fn api_sign_out(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(SessionResponse { admin: false })
}

#[get("/api/leagues")]
async fn api_list_leagues(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.store.leagues())
}

#[post("/api/leagues")]
async fn api_create_league(
    state: AppState,
    session: Session,
    body: Json<CreateLeagueBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    match g.store.create_league(access(&session), &body.name, body.players) {
        Ok((change, id)) => {
            g.commit(&change);
            match g.store.league(id) {
                Ok(league) => HttpResponse::Ok().json(league),
                Err(e) => error_response(&e),
            }
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/leagues/{id}")]
async fn api_get_league(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.league(path.id) {
        Ok(league) => HttpResponse::Ok().json(league),
        Err(e) => error_response(&e),
    }
}

/// Rename a league and/or edit its roster. Blank entries keep their current value.
#[put("/api/leagues/{id}")]
async fn api_update_league(
    state: AppState,
    session: Session,
    path: Path<LeaguePath>,
    body: Json<UpdateLeagueBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    match g
        .store
        .update_league(access(&session), path.id, body.name.as_deref(), body.players)
    {
        Ok(change) => {
            g.commit(&change);
            match g.store.league(path.id) {
                Ok(league) => HttpResponse::Ok().json(league),
                Err(e) => error_response(&e),
            }
        }
        Err(e) => error_response(&e),
    }
}

/// Delete a league together with its matches.
#[delete("/api/leagues/{id}")]
async fn api_delete_league(state: AppState, session: Session, path: Path<LeaguePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.delete_league(access(&session), path.id) {
        Ok(change) => {
            g.commit(&change);
            HttpResponse::Ok().json(g.store.leagues())
        }
        Err(e) => error_response(&e),
    }
}

/// Standings of every league, in league order.
#[get("/api/standings")]
async fn api_all_standings(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let all: Vec<LeagueStandings> = g
        .store
        .leagues()
        .iter()
        .map(|league| g.league_standings(league))
        .collect();
    HttpResponse::Ok().json(all)
}

#[get("/api/leagues/{id}/standings")]
async fn api_league_standings(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.league(path.id) {
        Ok(league) => HttpResponse::Ok().json(g.league_standings(league)),
        Err(e) => error_response(&e),
    }
}

#[get("/api/leagues/{id}/standings.csv")]
async fn api_league_standings_csv(state: AppState, path: Path<LeaguePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.store.league(path.id) {
        return error_response(&e);
    }
    let rows = g.board.standings(path.id).unwrap_or_default();
    csv_response(standings_csv(rows))
}

/// Match history, newest first.
#[get("/api/matches")]
async fn api_list_matches(state: AppState, query: Query<HistoryQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let views: Vec<MatchView> = g
        .store
        .history(query.league)
        .into_iter()
        .filter_map(|m| {
            let league = g.store.league(m.league_id).ok()?;
            Some(MatchView {
                record: m,
                league_name: &league.name,
                description: describe_match(league, m),
            })
        })
        .collect();
    HttpResponse::Ok().json(views)
}

#[get("/api/matches.csv")]
async fn api_matches_csv(state: AppState, query: Query<HistoryQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    csv_response(history_csv(&g.store, query.league))
}

/// Record a result; the date is the server's current time.
#[post("/api/matches")]
async fn api_record_match(state: AppState, session: Session, body: Json<RecordMatchBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let new_match = NewMatch {
        league_id: body.league_id,
        player1: body.player1,
        player2: body.player2,
        winner: body.winner,
    };
    match g.store.record_match(access(&session), new_match, Utc::now()) {
        Ok((change, id)) => {
            g.commit(&change);
            match g.store.get_match(id) {
                Ok(m) => HttpResponse::Ok().json(m),
                Err(e) => error_response(&e),
            }
        }
        Err(e) => error_response(&e),
    }
}

#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, session: Session, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.delete_match(access(&session), path.id) {
        Ok(change) => {
            g.commit(&change);
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(&e),
    }
}

/// Correct the date of a recorded match.
#[put("/api/matches/{id}/date")]
async fn api_set_match_date(
    state: AppState,
    session: Session,
    path: Path<MatchPath>,
    body: Json<MatchDateBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.update_match_date(access(&session), path.id, body.date) {
        Ok(change) => {
            g.commit(&change);
            match g.store.get_match(path.id) {
                Ok(m) => HttpResponse::Ok().json(m),
                Err(e) => error_response(&e),
            }
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/settings")]
async fn api_get_settings(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.store.settings())
}

/// Change players per group (resizes every league) and/or the point table.
#[put("/api/settings")]
async fn api_update_settings(
    state: AppState,
    session: Session,
    body: Json<UpdateSettingsBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let access = access(&session);
    if let Some(n) = body.players_per_group {
        match g.store.set_players_per_group(access, n) {
            Ok(change) => g.commit(&change),
            Err(e) => return error_response(&e),
        }
    }
    if let Some(choice) = &body.scoring {
        match g.store.set_scoring(access, choice.rules()) {
            Ok(change) => g.commit(&change),
            Err(e) => return error_response(&e),
        }
    }
    HttpResponse::Ok().json(g.store.settings())
}

/// Delete all matches and restore the default leagues.
#[post("/api/reset")]
async fn api_reset(state: AppState, session: Session) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.reset_to_defaults(access(&session)) {
        Ok(change) => {
            g.commit(&change);
            HttpResponse::Ok().json(g.store.leagues())
        }
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "static".to_string()
}

/// SESSION_KEY if it is long enough, otherwise a fresh key (sessions end on restart).
fn session_key() -> Key {
    match std::env::var("SESSION_KEY") {
        Ok(raw) => match Key::try_from(raw.as_bytes()) {
            Ok(key) => key,
            Err(_) => {
                log::warn!("SESSION_KEY must be at least 64 bytes; using a random key");
                Key::generate()
            }
        },
        Err(_) => Key::generate(),
    }
}

/// Load the store from DATA_FILE if present, otherwise seed defaults.
fn initial_store(data_file: Option<&std::path::Path>) -> std::io::Result<RosterStore> {
    let players_per_group = std::env::var("PLAYERS_PER_GROUP")
        .ok()
        .and_then(|n| n.parse().ok())
        .filter(|n| Settings::is_valid_players_per_group(*n));
    let seed = || {
        let mut settings = Settings::default();
        if let Some(n) = players_per_group {
            settings.players_per_group = n;
        }
        RosterStore::seeded(settings)
    };
    let Some(path) = data_file else {
        return Ok(seed());
    };
    match persist::load(path) {
        Ok(Some(store)) => Ok(store),
        Ok(None) => Ok(seed()),
        Err(e) => Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{}: {}", path.display(), e),
        )),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| default_static_dir());
    let cookie_secure = std::env::var("COOKIE_SECURE").map_or(false, |v| v == "1" || v == "true");
    let data_file = std::env::var("DATA_FILE").ok().map(PathBuf::from);
    let admin_token = std::env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());
    if admin_token.is_none() {
        log::warn!("ADMIN_TOKEN not set: nobody can sign in as admin");
    }

    let store = initial_store(data_file.as_deref())?;
    let state = Data::new(RwLock::new(Club::new(store, data_file)));
    let config = Data::new(ServerConfig { admin_token });
    let key = session_key();

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(cookie_secure)
                    .build(),
            )
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(favicon)
            .service(api_get_session)
            .service(api_sign_in)
            .service(api_sign_out)
            .service(api_list_leagues)
            .service(api_create_league)
            .service(api_league_standings_csv)
            .service(api_league_standings)
            .service(api_get_league)
            .service(api_update_league)
            .service(api_delete_league)
            .service(api_all_standings)
            .service(api_matches_csv)
            .service(api_list_matches)
            .service(api_record_match)
            .service(api_delete_match)
            .service(api_set_match_date)
            .service(api_get_settings)
            .service(api_update_settings)
            .service(api_reset)
            .service(Files::new("/static", &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
