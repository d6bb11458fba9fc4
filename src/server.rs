//!
//! chirp HTTP server
//! -----------------
//! This module defines the Axum-based HTTP API for chirp.
//!
//! Responsibilities:
//! - Login/logout endpoints backed by the session service.
//! - The identity gate layered over every protected route.
//! - Resource endpoints (users, tweets, likes, replies, followers)
//!   delegating to the services, which enforce ownership.
//! - Background revocation GC started alongside the listener.
//!

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, BearerToken, Identity, MemoryRevocationStore, RevocationBackend, TokenCodec};
use crate::config::Config;
use crate::error::AppError;
use crate::model::TweetKind;
use crate::service;
use crate::store::Stores;

/// Shared server state injected into all handlers.
///
/// The codec and revocation backend are the session authority; the stores
/// hold the resources the ownership guard protects. Everything is cheap to
/// clone per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub codec: Arc<TokenCodec>,
    pub revocations: Arc<dyn RevocationBackend>,
    pub stores: Stores,
}

pub async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    run_with_config(config).await
}

pub async fn run_with_config(config: Config) -> anyhow::Result<()> {
    // Codec construction validates the secret; a misconfigured secret aborts
    // startup here rather than failing requests later.
    let codec = Arc::new(TokenCodec::new(&config.jwt_secret, config.token_ttl)?);
    let revocations: Arc<dyn RevocationBackend> = Arc::new(MemoryRevocationStore::new());

    // Background revocation sweeper: once now, then on every interval.
    auth::spawn_revocation_gc(revocations.clone(), config.gc_interval);

    let http_port = config.http_port;
    let state = AppState {
        config: Arc::new(config),
        codec,
        revocations,
        stores: Stores::new(),
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/logout", post(logout))
        .route("/users/{id}", get(find_one_user).put(update_user).delete(remove_user))
        .route("/tweets", post(create_tweet).get(find_all_tweets))
        .route("/tweets/{id}", get(find_one_tweet).put(update_tweet).delete(remove_tweet))
        .route("/likes", post(create_like))
        .route("/likes/{id}", axum::routing::delete(remove_like))
        .route("/replies", post(create_reply).get(find_all_replies))
        .route("/replies/{id}", get(find_one_reply).put(update_reply).delete(remove_reply))
        .route("/followers", post(create_follower).get(find_all_followers))
        .route("/followers/{id}", axum::routing::delete(remove_follower))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_identity));

    // Registration and the user directory are the public surface; everything
    // mutating sits behind the gate.
    Router::new()
        .route("/", get(|| async { "chirp ok" }))
        .route("/login", post(login))
        .route("/users", post(create_user).get(find_all_users))
        .merge(protected)
        .with_state(state)
}

// --- session ---

#[derive(Debug, Deserialize)]
struct LoginPayload { email: String, password: String }

async fn login(State(state): State<AppState>, Json(payload): Json<LoginPayload>) -> Result<impl IntoResponse, AppError> {
    let out = auth::login(&state.stores.users, &state.codec, &payload.email, &payload.password)?;
    Ok((StatusCode::OK, Json(json!({
        "success": true,
        "message": "login successful",
        "data": { "token": out.token, "userId": out.user_id },
    }))))
}

async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<BearerToken>,
) -> Result<impl IntoResponse, AppError> {
    auth::logout(&state.codec, state.revocations.as_ref(), &token.0)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "logout successful"}))))
}

// --- users ---

#[derive(Debug, Deserialize)]
struct CreateUserPayload { name: String, email: String, handle: String, password: String }

#[derive(Debug, Deserialize)]
struct UpdateUserPayload { name: Option<String>, handle: Option<String>, password: Option<String> }

#[derive(Debug, Deserialize)]
struct UserQuery { email: Option<String> }

async fn create_user(State(state): State<AppState>, Json(payload): Json<CreateUserPayload>) -> Result<impl IntoResponse, AppError> {
    let dto = service::user::create(&state.stores, payload.name, payload.email, payload.handle, &payload.password)?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "message": "user created", "data": dto}))))
}

async fn find_all_users(State(state): State<AppState>, Query(q): Query<UserQuery>) -> impl IntoResponse {
    let dtos = service::user::find_all(&state.stores, q.email.as_deref());
    (StatusCode::OK, Json(json!({"success": true, "message": "users fetched", "data": dtos})))
}

async fn find_one_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::user::find_one(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "user fetched", "data": dto}))))
}

async fn update_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::user::update(&identity, &state.stores, id, payload.name, payload.handle, payload.password.as_deref())?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "user updated", "data": dto}))))
}

async fn remove_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::user::remove(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "user deleted", "data": dto}))))
}

// --- tweets ---

#[derive(Debug, Deserialize)]
struct CreateTweetPayload {
    content: String,
    #[serde(rename = "userId")]
    user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct UpdateContentPayload { content: String }

#[derive(Debug, Deserialize)]
struct KindQuery {
    #[serde(rename = "type")]
    kind: Option<TweetKind>,
}

async fn create_tweet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateTweetPayload>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::tweet::create(&identity, &state.stores, payload.content, payload.user_id)?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "message": "tweet created", "data": dto}))))
}

async fn find_all_tweets(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(q): Query<KindQuery>,
) -> impl IntoResponse {
    let dtos = service::tweet::find_all(&identity, &state.stores, q.kind);
    (StatusCode::OK, Json(json!({"success": true, "message": "tweets fetched", "data": dtos})))
}

async fn find_one_tweet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::tweet::find_one(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "tweet fetched", "data": dto}))))
}

async fn update_tweet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::tweet::update(&identity, &state.stores, id, payload.content)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "tweet updated", "data": dto}))))
}

async fn remove_tweet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::tweet::remove(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "tweet deleted", "data": dto}))))
}

// --- likes ---

#[derive(Debug, Deserialize)]
struct CreateLikePayload {
    #[serde(rename = "tweetId")]
    tweet_id: Uuid,
    #[serde(rename = "userId")]
    user_id: Option<Uuid>,
}

async fn create_like(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateLikePayload>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::like::create(&identity, &state.stores, payload.tweet_id, payload.user_id)?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "message": "like created", "data": dto}))))
}

async fn remove_like(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::like::remove(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "like deleted", "data": dto}))))
}

// --- replies ---

#[derive(Debug, Deserialize)]
struct CreateReplyPayload {
    content: String,
    #[serde(rename = "tweetId")]
    tweet_id: Uuid,
    #[serde(rename = "userId")]
    user_id: Option<Uuid>,
}

async fn create_reply(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateReplyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::reply::create(&identity, &state.stores, payload.content, payload.tweet_id, payload.user_id)?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "message": "reply created", "data": dto}))))
}

async fn find_all_replies(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(q): Query<KindQuery>,
) -> impl IntoResponse {
    let dtos = service::reply::find_all(&identity, &state.stores, q.kind);
    (StatusCode::OK, Json(json!({"success": true, "message": "replies fetched", "data": dtos})))
}

async fn find_one_reply(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::reply::find_one(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "reply fetched", "data": dto}))))
}

async fn update_reply(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::reply::update(&identity, &state.stores, id, payload.content)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "reply updated", "data": dto}))))
}

async fn remove_reply(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::reply::remove(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "reply deleted", "data": dto}))))
}

// --- followers ---

#[derive(Debug, Deserialize)]
struct CreateFollowerPayload {
    #[serde(rename = "userId")]
    user_id: Uuid,
    #[serde(rename = "followerId")]
    follower_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct FollowerQuery {
    #[serde(rename = "userId")]
    user_id: Option<Uuid>,
    #[serde(rename = "followerId")]
    follower_id: Option<Uuid>,
}

async fn create_follower(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CreateFollowerPayload>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::follower::create(&identity, &state.stores, payload.user_id, payload.follower_id)?;
    Ok((StatusCode::CREATED, Json(json!({"success": true, "message": "follower created", "data": dto}))))
}

async fn find_all_followers(State(state): State<AppState>, Query(q): Query<FollowerQuery>) -> impl IntoResponse {
    let dtos = service::follower::find_all(&state.stores, q.user_id, q.follower_id);
    (StatusCode::OK, Json(json!({"success": true, "message": "followers fetched", "data": dtos})))
}

async fn remove_follower(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dto = service::follower::remove(&identity, &state.stores, id)?;
    Ok((StatusCode::OK, Json(json!({"success": true, "message": "follower deleted", "data": dto}))))
}
