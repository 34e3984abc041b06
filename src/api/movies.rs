// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::extract::{paginate, JsonBody, PageQuery, ResourceId};
use crate::{
    auth::{Authorized, CreateMovies, DeleteMovies, EditMovies, ViewMovies},
    error::{ApiError, ErrorBody},
    models::{
        CreateMovieRequest, CreatedResponse, DeletedResponse, MovieListResponse,
        MovieUpdatedResponse, UpdateMovieRequest,
    },
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/movies",
    params(PageQuery),
    tag = "Movies",
    security(("bearer_auth" = ["view:movies"])),
    responses(
        (status = 200, body = MovieListResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, description = "Requested page is empty", body = ErrorBody)
    )
)]
pub async fn list_movies(
    _auth: Authorized<ViewMovies>,
    State(state): State<AppState>,
    query: PageQuery,
) -> Result<Json<MovieListResponse>, ApiError> {
    let movies = paginate(state.movies().list()?, query.page());
    if movies.is_empty() {
        return Err(ApiError::not_found("No movies found in database."));
    }

    Ok(Json(MovieListResponse {
        success: true,
        movies,
    }))
}

#[utoipa::path(
    post,
    path = "/movies",
    request_body = CreateMovieRequest,
    tag = "Movies",
    security(("bearer_auth" = ["create:movies"])),
    responses(
        (status = 200, body = CreatedResponse),
        (status = 400, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn create_movie(
    auth: Authorized<CreateMovies>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateMovieRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let new_movie = request.validate()?;
    let movie = state.movies().create(new_movie)?;

    tracing::info!(movie_id = movie.id, subject = auth.subject(), "Created movie");

    Ok(Json(CreatedResponse {
        success: true,
        created: movie.id,
    }))
}

#[utoipa::path(
    patch,
    path = "/movies/{id}",
    params(("id" = u64, Path, description = "Movie identifier")),
    request_body = UpdateMovieRequest,
    tag = "Movies",
    security(("bearer_auth" = ["edit:movies"])),
    responses(
        (status = 200, body = MovieUpdatedResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn update_movie(
    auth: Authorized<EditMovies>,
    State(state): State<AppState>,
    ResourceId(movie_id): ResourceId,
    JsonBody(request): JsonBody<UpdateMovieRequest>,
) -> Result<Json<MovieUpdatedResponse>, ApiError> {
    request.validate()?;
    let movie = state.movies().update(movie_id, |movie| request.apply(movie))?;

    tracing::info!(movie_id, subject = auth.subject(), "Updated movie");

    Ok(Json(MovieUpdatedResponse {
        success: true,
        updated: movie.id,
        movie,
    }))
}

/// Deleting a movie removes it from the `movie_id` of every actor cast in it.
#[utoipa::path(
    delete,
    path = "/movies/{id}",
    params(("id" = u64, Path, description = "Movie identifier")),
    tag = "Movies",
    security(("bearer_auth" = ["delete:movies"])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_movie(
    auth: Authorized<DeleteMovies>,
    State(state): State<AppState>,
    ResourceId(movie_id): ResourceId,
) -> Result<Json<DeletedResponse>, ApiError> {
    let uncast = state.movies().delete(movie_id)?;

    tracing::info!(movie_id, uncast, subject = auth.subject(), "Deleted movie");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: movie_id,
    }))
}
