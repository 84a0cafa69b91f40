#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{
        HeaderMap, StatusCode,
        header::{COOKIE, SET_COOKIE},
    },
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::SignedCookieJar;
use musicgpt::{
    api::cookies,
    config::Settings,
    server::{self, AppState},
    types::Session,
};
use reqwest::{
    Url,
    cookie::{CookieStore, Jar},
};
use serde_json::{Value, json};

pub const VALID_CODE: &str = "good-code";
pub const REFRESH_TOKEN: &str = "refresh-1";

/// Recorded traffic and canned answers of the fake Spotify and completion APIs.
pub struct Upstream {
    pub calls: Mutex<Vec<String>>,
    pub completion_requests: Mutex<Vec<Value>>,
    pub created_playlists: Mutex<Vec<Value>>,
    pub added_uris: Mutex<Vec<String>>,
    pub playlist_reply: Mutex<String>,
    pub image_polls: AtomicUsize,
    pub image_ready_after: usize,
    /// Answer every user endpoint with 401, as for a revoked token.
    pub reject_token: AtomicBool,
}

impl Upstream {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            completion_requests: Mutex::new(Vec::new()),
            created_playlists: Mutex::new(Vec::new()),
            added_uris: Mutex::new(Vec::new()),
            playlist_reply: Mutex::new(song_reply(10)),
            image_polls: AtomicUsize::new(0),
            image_ready_after: 2,
            reject_token: AtomicBool::new(false),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn spotify_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("POST /chat/completions"))
            .collect()
    }

    fn token_rejected(&self) -> Option<(StatusCode, Json<Value>)> {
        self.reject_token.load(Ordering::SeqCst).then(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
            )
        })
    }

    pub fn set_playlist_reply(&self, reply: impl Into<String>) {
        *self.playlist_reply.lock().unwrap() = reply.into();
    }
}

/// A model reply listing `n` songs named `Song i` by `Artist i`.
pub fn song_reply(n: usize) -> String {
    let playlist: Vec<Value> = (1..=n)
        .map(|i| json!({ "artist": format!("Artist {i}"), "song": format!("Song {i}") }))
        .collect();
    json!({ "playlist": playlist }).to_string()
}

/// Track URI the fake search hands out for a query.
pub fn uri_for(song: &str, artist: &str) -> String {
    format!("spotify:track:{}", format!("{song} {artist}").replace(' ', "_"))
}

async fn token(
    State(up): State<Arc<Upstream>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let grant = form.get("grant_type").cloned().unwrap_or_default();
    up.record(format!("POST /api/token {grant}"));

    match grant.as_str() {
        "authorization_code" if form.get("code").map(String::as_str) == Some(VALID_CODE) => (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-1",
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": 3600,
                "refresh_token": REFRESH_TOKEN,
            })),
        ),
        "refresh_token" if form.get("refresh_token").map(String::as_str) == Some(REFRESH_TOKEN) => (
            StatusCode::OK,
            Json(json!({
                "access_token": "access-2",
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": 3600,
            })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code",
            })),
        ),
    }
}

async fn completions(State(up): State<Arc<Upstream>>, Json(body): Json<Value>) -> Json<Value> {
    up.record("POST /chat/completions");
    up.completion_requests.lock().unwrap().push(body.clone());

    let prompt = body["messages"][0]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    let reply = match prompt.find("Prompt:'") {
        Some(idx) => {
            let asked = prompt[idx..].to_lowercase();
            if asked.contains("playlist") || asked.contains("recommend") {
                "recs".to_string()
            } else if asked.contains("top songs") || asked.contains("top tracks") {
                "tracks".to_string()
            } else {
                "no".to_string()
            }
        }
        None => up.playlist_reply.lock().unwrap().clone(),
    };

    Json(json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": reply } }],
    }))
}

async fn me(State(up): State<Arc<Upstream>>) -> (StatusCode, Json<Value>) {
    up.record("GET /me");
    if let Some(rejected) = up.token_rejected() {
        return rejected;
    }
    (
        StatusCode::OK,
        Json(json!({ "id": "user-1", "display_name": "Test User" })),
    )
}

async fn top_tracks(
    State(up): State<Arc<Upstream>>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    up.record(format!(
        "GET /me/top/tracks time_range={} limit={}",
        query.get("time_range").cloned().unwrap_or_default(),
        query.get("limit").cloned().unwrap_or_default()
    ));
    if let Some(rejected) = up.token_rejected() {
        return rejected;
    }
    (
        StatusCode::OK,
        Json(json!({
            "items": [
                { "id": "t1", "name": "Track One", "artists": [{ "name": "Artist One" }] },
                { "id": "t2", "name": "Track Two", "artists": [{ "name": "Artist Two" }, { "name": "Guest" }] },
                { "id": "t3", "name": "Track Three", "artists": [{ "name": "Artist Three" }] },
            ]
        })),
    )
}

async fn create_playlist(
    State(up): State<Arc<Upstream>>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    up.record(format!("POST /users/{user_id}/playlists"));
    up.created_playlists.lock().unwrap().push(body.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "id": "pl-1", "name": body["name"] })),
    )
}

async fn search(
    State(up): State<Arc<Upstream>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let q = query.get("q").cloned().unwrap_or_default();
    up.record(format!("GET /search {q}"));

    if q.contains("Nonexistent") {
        return Json(json!({ "tracks": { "items": [] } }));
    }
    Json(json!({
        "tracks": {
            "items": [{ "id": q.replace(' ', "_"), "name": q, "artists": [] }]
        }
    }))
}

async fn add_tracks(
    State(up): State<Arc<Upstream>>,
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    up.record(format!("POST /playlists/{playlist_id}/tracks"));
    let uris: Vec<String> = body["uris"]
        .as_array()
        .map(|a| a.iter().filter_map(|u| u.as_str().map(String::from)).collect())
        .unwrap_or_default();
    *up.added_uris.lock().unwrap() = uris;
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap-1" })))
}

async fn images(State(up): State<Arc<Upstream>>, Path(playlist_id): Path<String>) -> Json<Value> {
    up.record(format!("GET /playlists/{playlist_id}/images"));
    let polls = up.image_polls.fetch_add(1, Ordering::SeqCst) + 1;
    if polls < up.image_ready_after {
        return Json(json!([]));
    }
    Json(json!([{
        "url": format!("https://i.scdn.co/image/{playlist_id}"),
        "height": 640,
        "width": 640,
    }]))
}

fn upstream_router(up: Arc<Upstream>) -> Router {
    Router::new()
        .route("/api/token", post(token))
        .route("/v1/chat/completions", post(completions))
        .route("/v1/me", get(me))
        .route("/v1/me/top/tracks", get(top_tracks))
        .route("/v1/users/{user_id}/playlists", post(create_playlist))
        .route("/v1/search", get(search))
        .route("/v1/playlists/{playlist_id}/tracks", post(add_tracks))
        .route("/v1/playlists/{playlist_id}/images", get(images))
        .with_state(up)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

pub fn settings_for(upstream: SocketAddr) -> Settings {
    let base = format!("http://{upstream}");
    let vars: HashMap<&str, String> = HashMap::from([
        ("OPENAI_APIKEY", "sk-test".to_string()),
        ("OPENAI_API_URL", format!("{base}/v1")),
        ("OPENAI_MODEL", "gpt-test".to_string()),
        ("APP_SECRETKEY", "test-secret".to_string()),
        ("CLIENT_ID", "client-id".to_string()),
        ("CLIENT_SECRET", "client-secret".to_string()),
        ("REDIRECT_URI", "http://127.0.0.1:5000/callback".to_string()),
        ("SPOTIFY_API_AUTH_URL", format!("{base}/authorize")),
        ("SPOTIFY_API_TOKEN_URL", format!("{base}/api/token")),
        ("SPOTIFY_API_URL", format!("{base}/v1")),
        ("REQUEST_TIMEOUT_SECS", "5".to_string()),
        ("IMAGE_POLL_ATTEMPTS", "4".to_string()),
        ("IMAGE_POLL_DELAY_MS", "10".to_string()),
    ]);
    Settings::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
    pub upstream: Arc<Upstream>,
    /// Browser-like client that keeps the cookies the app sets.
    pub client: reqwest::Client,
    pub cookies: Arc<Jar>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn base_url(&self) -> Url {
        Url::parse(&self.url("/")).unwrap()
    }

    /// Logs `client` in directly, as if it had completed the callback.
    pub async fn store_session(&self, expires_in: i64) {
        self.store_session_with(Session {
            access_token: "access-1".to_string(),
            refresh_token: REFRESH_TOKEN.to_string(),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        })
        .await;
    }

    pub async fn store_session_with(&self, session: Session) {
        let owner = self.state.session.start(session).await;
        let response = SignedCookieJar::new(self.state.cookie_key.clone())
            .add(cookies::session_cookie(owner))
            .into_response();
        for header in response.headers().get_all(SET_COOKIE) {
            self.cookies
                .add_cookie_str(header.to_str().unwrap(), &self.base_url());
        }
    }

    /// Session owner id carried by `client`'s cookies.
    pub fn session_owner(&self) -> Option<String> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, self.cookies.cookies(&self.base_url())?);
        let jar = SignedCookieJar::from_headers(&headers, self.state.cookie_key.clone());
        cookies::session_owner(&jar)
    }

    /// The stored session as `client` sees it.
    pub async fn session(&self) -> Option<Session> {
        let owner = self.session_owner();
        self.state.session.current(owner.as_deref()).await
    }

    pub async fn chat(&self, msg: &str) -> reqwest::Response {
        chat_as(&self.client, &self.url("/get"), msg).await
    }

    /// A second browser with an empty cookie jar.
    pub fn stranger(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .unwrap()
    }
}

pub async fn chat_as(client: &reqwest::Client, url: &str, msg: &str) -> reqwest::Response {
    client.post(url).form(&[("msg", msg)]).send().await.unwrap()
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut Settings)) -> TestApp {
    let upstream = Arc::new(Upstream::new());
    let upstream_addr = serve(upstream_router(Arc::clone(&upstream))).await;

    let mut settings = settings_for(upstream_addr);
    configure(&mut settings);
    let state = AppState::new(settings).unwrap();
    let addr = serve(server::router(state.clone())).await;

    let cookies = Arc::new(Jar::default());
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_provider(Arc::clone(&cookies))
        .build()
        .unwrap();

    TestApp {
        addr,
        state,
        upstream,
        client,
        cookies,
    }
}
