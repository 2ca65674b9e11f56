//! Appointment CRUD handlers
//!
//! All routes require a bearer token. Id-scoped operations run the
//! ownership check: a missing id is NotFound, a foreign owner is
//! Forbidden, evaluated in that order.

use super::types::{
    CreateAppointmentRequest, DeletedResponse, ListAppointmentsQuery, UpdateAppointmentRequest,
};
use crate::{auth::AuthUser, error::ApiError, AppState};
use apptrack_core::Appointment;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// Fetch an appointment and authorize the caller as its owner
async fn fetch_owned(
    state: &AppState,
    id: &str,
    user_id: &str,
) -> Result<Appointment, ApiError> {
    let appointment = state
        .appointments
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Appointment not found"))?;

    if appointment.user_id != user_id {
        return Err(ApiError::forbidden("User not authorized"));
    }

    Ok(appointment)
}

/// List the caller's appointments
///
/// `from`/`to` bound the start time for calendar views.
#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Appointments",
    summary = "List appointments",
    params(ListAppointmentsQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Appointments owned by the caller", body = [Appointment]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = state
        .appointments
        .list_for_user(&user.id, query.from, query.to)
        .await?;

    Ok(Json(appointments))
}

/// Create a new appointment owned by the caller
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    summary = "Create an appointment",
    request_body = CreateAppointmentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let title = request
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let (Some(title), Some(description), Some(start_time), Some(end_time)) =
        (title, description, request.start_time, request.end_time)
    else {
        return Err(ApiError::bad_request("Please add all required fields"));
    };

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4().to_string(),
        user_id: user.id,
        title,
        description,
        start_time,
        end_time,
        status: request.status.unwrap_or_default(),
        reminder: request.reminder.unwrap_or(true),
        reminder_time: request.reminder_time,
        created_at: now,
        updated_at: now,
    };

    state.appointments.insert(&appointment).await?;

    info!("appointment created: {}", appointment.id);
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Get a single appointment
#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    summary = "Get an appointment",
    params(("id" = String, Path, description = "Appointment id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The appointment", body = Appointment),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such appointment")
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = fetch_owned(&state, &id, &user.id).await?;
    Ok(Json(appointment))
}

/// Update an appointment
#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    summary = "Update an appointment",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = UpdateAppointmentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such appointment")
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, ApiError> {
    let mut appointment = fetch_owned(&state, &id, &user.id).await?;

    if let Some(title) = request.title {
        appointment.title = title;
    }
    if let Some(description) = request.description {
        appointment.description = description;
    }
    if let Some(start_time) = request.start_time {
        appointment.start_time = start_time;
    }
    if let Some(end_time) = request.end_time {
        appointment.end_time = end_time;
    }
    if let Some(status) = request.status {
        appointment.status = status;
    }
    if let Some(reminder) = request.reminder {
        appointment.reminder = reminder;
    }
    if let Some(reminder_time) = request.reminder_time {
        appointment.reminder_time = Some(reminder_time);
    }
    appointment.updated_at = Utc::now();

    state.appointments.update(&appointment).await?;

    info!("appointment updated: {}", appointment.id);
    Ok(Json(appointment))
}

/// Delete an appointment
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    tag = "Appointments",
    summary = "Delete an appointment",
    params(("id" = String, Path, description = "Appointment id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Appointment deleted", body = DeletedResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "No such appointment")
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let appointment = fetch_owned(&state, &id, &user.id).await?;

    state.appointments.delete(&appointment.id).await?;

    info!("appointment deleted: {}", appointment.id);
    Ok(Json(DeletedResponse { id: appointment.id }))
}
