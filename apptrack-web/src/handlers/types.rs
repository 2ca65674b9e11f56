//! Request and response types for the HTTP surface

use apptrack_core::AppointmentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Appointment creation request
///
/// Fields are optional at the deserialization layer so that missing
/// values produce the taxonomy's BadRequest rather than a decoder error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub reminder: Option<bool>,
    pub reminder_time: Option<DateTime<Utc>>,
}

/// Partial appointment update: absent fields keep their stored values
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub reminder: Option<bool>,
    pub reminder_time: Option<DateTime<Utc>>,
}

/// Start-time window for calendar listings
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListAppointmentsQuery {
    /// Earliest start time to include (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Latest start time to include (RFC 3339)
    pub to: Option<DateTime<Utc>>,
}

/// Deletion acknowledgement carrying the removed id
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub id: String,
}
