// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use super::extract::{paginate, JsonBody, PageQuery, ResourceId};
use crate::{
    auth::{Authorized, CreateActors, DeleteActors, EditActors, ViewActors},
    error::{ApiError, ErrorBody},
    models::{
        ActorListResponse, ActorUpdatedResponse, CreateActorRequest, CreatedResponse,
        DeletedResponse, UpdateActorRequest,
    },
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/actors",
    params(PageQuery),
    tag = "Actors",
    security(("bearer_auth" = ["view:actors"])),
    responses(
        (status = 200, body = ActorListResponse),
        (status = 401, body = ErrorBody),
        (status = 403, body = ErrorBody),
        (status = 404, description = "Requested page is empty", body = ErrorBody)
    )
)]
pub async fn list_actors(
    _auth: Authorized<ViewActors>,
    State(state): State<AppState>,
    query: PageQuery,
) -> Result<Json<ActorListResponse>, ApiError> {
    let actors = paginate(state.actors().list()?, query.page());
    if actors.is_empty() {
        return Err(ApiError::not_found("No actors found in database."));
    }

    Ok(Json(ActorListResponse {
        success: true,
        actors,
    }))
}

#[utoipa::path(
    post,
    path = "/actors",
    request_body = CreateActorRequest,
    tag = "Actors",
    security(("bearer_auth" = ["create:actors"])),
    responses(
        (status = 200, body = CreatedResponse),
        (status = 400, body = ErrorBody),
        (status = 422, description = "Missing fields or unknown movie", body = ErrorBody)
    )
)]
pub async fn create_actor(
    auth: Authorized<CreateActors>,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateActorRequest>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let new_actor = request.validate()?;
    let actor = state.actors().create(new_actor)?;

    tracing::info!(actor_id = actor.id, subject = auth.subject(), "Created actor");

    Ok(Json(CreatedResponse {
        success: true,
        created: actor.id,
    }))
}

#[utoipa::path(
    patch,
    path = "/actors/{id}",
    params(("id" = u64, Path, description = "Actor identifier")),
    request_body = UpdateActorRequest,
    tag = "Actors",
    security(("bearer_auth" = ["edit:actors"])),
    responses(
        (status = 200, body = ActorUpdatedResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn update_actor(
    auth: Authorized<EditActors>,
    State(state): State<AppState>,
    ResourceId(actor_id): ResourceId,
    JsonBody(request): JsonBody<UpdateActorRequest>,
) -> Result<Json<ActorUpdatedResponse>, ApiError> {
    request.validate()?;
    let actor = state.actors().update(actor_id, |actor| request.apply(actor))?;

    tracing::info!(actor_id, subject = auth.subject(), "Updated actor");

    Ok(Json(ActorUpdatedResponse {
        success: true,
        updated: actor.id,
        actor,
    }))
}

#[utoipa::path(
    delete,
    path = "/actors/{id}",
    params(("id" = u64, Path, description = "Actor identifier")),
    tag = "Actors",
    security(("bearer_auth" = ["delete:actors"])),
    responses(
        (status = 200, body = DeletedResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_actor(
    auth: Authorized<DeleteActors>,
    State(state): State<AppState>,
    ResourceId(actor_id): ResourceId,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.actors().delete(actor_id)?;

    tracing::info!(actor_id, subject = auth.subject(), "Deleted actor");

    Ok(Json(DeletedResponse {
        success: true,
        deleted: actor_id,
    }))
}
