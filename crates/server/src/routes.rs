pub mod guard;
pub mod posts;

use axum::{
    middleware,
    routing::{get, on, MethodFilter, MethodRouter},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

/// API identity, as advertised in the OpenAPI document.
pub const API_NAME: &str = "posts";
pub const API_VERSION: &str = "v1";
pub const API_DESCRIPTION: &str = "posts api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Add,
    SetFavorite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
}

impl Verb {
    pub fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
        }
    }
}

/// One row of the route table: which operation answers which method and path.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub op: Operation,
    pub name: &'static str,
    pub verb: Verb,
    pub path: &'static str,
}

pub const POST_ROUTES: [RouteSpec; 3] = [
    RouteSpec { op: Operation::List, name: "getPosts", verb: Verb::Get, path: "/posts" },
    RouteSpec { op: Operation::Add, name: "addPost", verb: Verb::Post, path: "/posts" },
    RouteSpec { op: Operation::SetFavorite, name: "setFavorite", verb: Verb::Put, path: "/posts" },
];

fn method_router(spec: &RouteSpec) -> MethodRouter<ServerState> {
    let filter = spec.verb.filter();
    match spec.op {
        Operation::List => on(filter, posts::list),
        Operation::Add => on(filter, posts::add),
        Operation::SetFavorite => on(filter, posts::set_favorite),
    }
}

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Posts routes from [`POST_ROUTES`], all behind the referer guard.
fn posts_router(state: &ServerState) -> Router<ServerState> {
    POST_ROUTES
        .iter()
        .fold(Router::new(), |router, spec| {
            tracing::debug!(name = spec.name, method = spec.verb.as_str(), path = spec.path, "register route");
            router.route(spec.path, method_router(spec))
        })
        .route_layer(middleware::from_fn_with_state(
            state.referer_policy.clone(),
            guard::require_referer,
        ))
}

/// Build the full application router. `base_path` is empty or starts with `/`.
pub fn build_router(state: ServerState, base_path: &str, cors: CorsLayer) -> Router {
    let posts = posts_router(&state);
    let posts = if base_path.is_empty() {
        posts
    } else {
        Router::new().nest(base_path, posts)
    };

    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json));

    public
        .merge(posts)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
