use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::error::HttpError;
use crate::application::feed::FeedService;
use crate::application::follow::FollowService;
use crate::application::posts::{PostDraft, PostService};
use crate::application::repos::UsersRepo;
use crate::application::timeline::TimelineService;
use crate::domain::entities::CommentView;
use crate::infra::db::PostgresRepositories;
use crate::presentation::views::{
    CommentCard, FollowFeedView, FollowView, GroupView, PostDetailView, ProfileView, render_json,
};

use super::{
    db_health_response,
    extract::{ApiJson, ApiPath, ApiQuery},
    json_response,
    middleware::{log_responses, set_request_context},
    viewer::{MaybeViewer, Viewer},
};

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub timeline: Arc<TimelineService>,
    pub follows: Arc<FollowService>,
    pub posts: Arc<PostService>,
    pub users: Arc<dyn UsersRepo>,
    /// Present when running on Postgres; probed by `/_health`.
    pub db: Option<Arc<PostgresRepositories>>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/group/{slug}", get(group_posts))
        .route("/profile/{username}", get(profile))
        .route("/profile/{username}/follow", post(profile_follow))
        .route("/profile/{username}/unfollow", post(profile_unfollow))
        .route("/follow", get(follow_index))
        .route("/create", post(post_create))
        .route("/posts/{id}", get(post_detail))
        .route("/posts/{id}/edit", post(post_edit))
        .route("/posts/{id}/comment", post(add_comment))
        .route("/_health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentForm {
    text: String,
}

async fn index(
    State(state): State<HttpState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Response {
    match state.timeline.render_index(query.page.as_deref()).await {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn group_posts(
    State(state): State<HttpState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Response, HttpError> {
    let timeline = state
        .feed
        .group_timeline(&slug, query.page.as_deref())
        .await?;
    let body = render_json(&GroupView::from(&timeline))?;
    Ok(json_response(StatusCode::OK, body))
}

async fn profile(
    State(state): State<HttpState>,
    viewer: MaybeViewer,
    ApiPath(username): ApiPath<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Response, HttpError> {
    let profile = state
        .feed
        .author_profile(&username, viewer.id(), query.page.as_deref())
        .await?;
    let body = render_json(&ProfileView::from(&profile))?;
    Ok(json_response(StatusCode::OK, body))
}

async fn follow_index(
    State(state): State<HttpState>,
    Viewer(viewer): Viewer,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Response, HttpError> {
    let page = state
        .feed
        .follower_feed(viewer.id, query.page.as_deref())
        .await?;
    let body = render_json(&FollowFeedView::from(&page))?;
    Ok(json_response(StatusCode::OK, body))
}

async fn profile_follow(
    State(state): State<HttpState>,
    Viewer(viewer): Viewer,
    ApiPath(username): ApiPath<String>,
) -> Result<Response, HttpError> {
    let outcome = state.follows.follow_username(viewer.id, &username).await?;
    let body = render_json(&FollowView::new(&username, outcome))?;
    Ok(json_response(StatusCode::OK, body))
}

async fn profile_unfollow(
    State(state): State<HttpState>,
    Viewer(viewer): Viewer,
    ApiPath(username): ApiPath<String>,
) -> Result<Response, HttpError> {
    let outcome = state.follows.unfollow_username(viewer.id, &username).await?;
    let body = render_json(&FollowView::new(&username, outcome))?;
    Ok(json_response(StatusCode::OK, body))
}

async fn post_detail(
    State(state): State<HttpState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Response, HttpError> {
    let detail = state.posts.post_detail(id, query.page.as_deref()).await?;
    let body = render_json(&PostDetailView::from(&detail))?;
    Ok(json_response(StatusCode::OK, body))
}

async fn post_create(
    State(state): State<HttpState>,
    Viewer(viewer): Viewer,
    ApiJson(draft): ApiJson<PostDraft>,
) -> Result<Response, HttpError> {
    let post = state.posts.create_post(viewer.id, draft).await?;
    let body = render_json(&post)?;
    Ok(json_response(StatusCode::CREATED, body))
}

async fn post_edit(
    State(state): State<HttpState>,
    Viewer(viewer): Viewer,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(draft): ApiJson<PostDraft>,
) -> Result<Response, HttpError> {
    let post = state.posts.edit_post(viewer.id, id, draft).await?;
    let body = render_json(&post)?;
    Ok(json_response(StatusCode::OK, body))
}

async fn add_comment(
    State(state): State<HttpState>,
    Viewer(viewer): Viewer,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(form): ApiJson<CommentForm>,
) -> Result<Response, HttpError> {
    let comment = state.posts.add_comment(viewer.id, id, &form.text).await?;
    let card = CommentCard::from(&CommentView {
        comment,
        author_username: viewer.username,
    });
    let body = render_json(&card)?;
    Ok(json_response(StatusCode::CREATED, body))
}

async fn health(State(state): State<HttpState>) -> Response {
    match state.db.as_ref() {
        Some(db) => db_health_response(db.health_check().await),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn not_found() -> HttpError {
    HttpError::new(
        "infra::http::public::not_found",
        StatusCode::NOT_FOUND,
        "Resource not found",
        "no route matched",
    )
}
