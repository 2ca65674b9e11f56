//! OpenAPI specification for the apptrack web server

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::auth::store::{AuthResponse, LoginRequest, RegisterRequest};
use crate::handlers::{
    CreateAppointmentRequest, DeletedResponse, HealthResponse, UpdateAppointmentRequest,
};
use apptrack_core::{Appointment, AppointmentStatus, Role, UserProfile};

/// Main OpenAPI specification
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Apptrack API",
        version = "0.1.0",
        description = "Appointment scheduling REST API with JWT authentication"
    ),
    servers(
        (url = "http://localhost:5001", description = "Local development server")
    ),
    paths(
        // Health
        crate::handlers::health_check,

        // Users
        crate::auth::handlers::register_user,
        crate::auth::handlers::login_user,
        crate::auth::handlers::get_me,

        // Appointments
        crate::handlers::list_appointments,
        crate::handlers::create_appointment,
        crate::handlers::get_appointment,
        crate::handlers::update_appointment,
        crate::handlers::delete_appointment,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserProfile,
            Role,
            Appointment,
            AppointmentStatus,
            CreateAppointmentRequest,
            UpdateAppointmentRequest,
            DeletedResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "Registration, login, and identity"),
        (name = "Appointments", description = "Owner-scoped appointment CRUD"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for the API
pub struct SecurityAddon;

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
