// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, Method, StatusCode},
    response::Response,
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{envelope, ErrorBody},
    models::{
        Actor, ActorListResponse, ActorUpdatedResponse, CreateActorRequest, CreateMovieRequest,
        CreatedResponse, DeletedResponse, Movie, MovieListResponse, MovieUpdatedResponse,
        UpdateActorRequest, UpdateMovieRequest,
    },
    state::AppState,
};

pub mod actors;
pub mod extract;
pub mod health;
pub mod movies;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route(
            "/actors",
            get(actors::list_actors).post(actors::create_actor),
        )
        .route(
            "/actors/{id}",
            patch(actors::update_actor).delete(actors::delete_actor),
        )
        .route(
            "/movies",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route(
            "/movies/{id}",
            patch(movies::update_movie).delete(movies::delete_movie),
        )
        .method_not_allowed_fallback(method_not_allowed)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors()),
        )
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn not_found() -> Response {
    envelope(StatusCode::NOT_FOUND, "Resource not found.")
}

async fn method_not_allowed() -> Response {
    envelope(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        actors::list_actors,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
        movies::list_movies,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie
    ),
    components(
        schemas(
            Actor,
            Movie,
            CreateActorRequest,
            UpdateActorRequest,
            CreateMovieRequest,
            UpdateMovieRequest,
            ActorListResponse,
            MovieListResponse,
            CreatedResponse,
            ActorUpdatedResponse,
            MovieUpdatedResponse,
            DeletedResponse,
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Actors", description = "Actor records"),
        (name = "Movies", description = "Movie records"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
