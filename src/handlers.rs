use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::ledger::BookingRequest;
use crate::models::{Booking, BookingSummary, ClassRecord, Notification};
use crate::registry::ClassFields;
use crate::AppState;

// Missing body fields deserialize to empty strings so the core validation
// answers with the documented 400 envelope instead of a deserializer reject.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassPayload {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub exercise_type: String,
    #[serde(default)]
    #[schema(example = "2026-03-02")]
    pub date: String,
    #[serde(default)]
    #[schema(example = "10:00")]
    pub time: String,
    #[serde(default)]
    pub place: String,
}

impl From<ClassPayload> for ClassFields {
    fn from(value: ClassPayload) -> Self {
        ClassFields {
            category: value.category,
            exercise_type: value.exercise_type,
            date: value.date,
            time: value.time,
            place: value.place,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookClassPayload {
    #[serde(default)]
    pub class_id: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub exercise_type: String,
    pub instructor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassResponse {
    pub success: bool,
    pub message: String,
    pub class: ClassRecord,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassListResponse {
    pub success: bool,
    pub classes: Vec<ClassRecord>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub success: bool,
    pub message: String,
    pub booking: Booking,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingsResponse {
    pub success: bool,
    pub bookings: Vec<BookingSummary>,
    pub booked_class_ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub success: bool,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub success: bool,
    pub message: String,
    pub notification: Notification,
}

#[utoipa::path(get, path = "/", tag = "meta")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "FitTime Booking API",
        "endpoints": {
            "/api/classes": "Class catalog and instructor scheduling",
            "/api/bookings": "Book and cancel classes",
            "/api/notifications": "Per-user notification feed"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "meta")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "meta")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = ClassPayload,
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "No caller identity")
    ),
    security(("user_identity" = [])),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ClassPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let class = state.registry.create(&user.id, &user.name, payload.into())?;
    Ok((
        StatusCode::CREATED,
        Json(ClassResponse {
            success: true,
            message: "Class created successfully".into(),
            class,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    responses((status = 200, description = "All classes", body = ClassListResponse)),
    tag = "classes"
)]
pub async fn list_classes(State(state): State<AppState>) -> impl IntoResponse {
    Json(ClassListResponse {
        success: true,
        classes: state.registry.list(),
    })
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    request_body = ClassPayload,
    responses(
        (status = 200, description = "Class updated", body = ClassResponse),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Unknown class")
    ),
    security(("user_identity" = [])),
    tag = "classes"
)]
pub async fn update_class(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<ClassPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let class = state.registry.update(&id, payload.into())?;
    Ok(Json(ClassResponse {
        success: true,
        message: "Class updated successfully".into(),
        class,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 404, description = "Unknown class")
    ),
    security(("user_identity" = [])),
    tag = "classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.registry.delete(&id)?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Class deleted successfully".into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/bookings/my-bookings",
    responses((status = 200, description = "Caller's active bookings", body = MyBookingsResponse)),
    security(("user_identity" = [])),
    tag = "bookings"
)]
pub async fn my_bookings(State(state): State<AppState>, user: AuthUser) -> impl IntoResponse {
    let (bookings, booked_class_ids) = state.ledger.list_my_bookings(&user.id);
    Json(MyBookingsResponse {
        success: true,
        bookings,
        booked_class_ids,
    })
}

#[utoipa::path(
    post,
    path = "/api/bookings/book-class",
    request_body = BookClassPayload,
    responses(
        (status = 201, description = "Class booked", body = BookingResponse),
        (status = 400, description = "Missing fields, no instructor, or already booked"),
        (status = 404, description = "Unknown class")
    ),
    security(("user_identity" = [])),
    tag = "bookings"
)]
pub async fn book_class(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BookClassPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state.ledger.book_class(
        &user.id,
        &user.name,
        BookingRequest {
            class_id: payload.class_id,
            class_name: payload.class_name,
            date: payload.date,
            time: payload.time,
            place: payload.place,
            exercise_type: payload.exercise_type,
            instructor: payload.instructor,
        },
    )?;
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            message: "Class booked successfully".into(),
            booking,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/bookings/{id}/cancel",
    responses(
        (status = 200, description = "Booking cancelled and deleted", body = MessageResponse),
        (status = 404, description = "No active booking with this id")
    ),
    security(("user_identity" = [])),
    tag = "bookings"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.ledger.cancel_booking(&id, &user.id)?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Booking cancelled and deleted successfully".into(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/bookings/class/{class_id}/cancel",
    responses(
        (status = 200, description = "Booking soft-cancelled", body = BookingResponse),
        (status = 404, description = "No active booking for this class")
    ),
    security(("user_identity" = [])),
    tag = "bookings"
)]
pub async fn cancel_booking_by_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(class_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state.ledger.cancel_booking_by_class(&class_id, &user.id)?;
    Ok(Json(BookingResponse {
        success: true,
        message: "Booking cancelled successfully".into(),
        booking,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    responses(
        (status = 200, description = "Booking deleted", body = MessageResponse),
        (status = 404, description = "No booking with this id")
    ),
    security(("user_identity" = [])),
    tag = "bookings"
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.ledger.delete_booking(&id, &user.id)?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Booking cancelled successfully".into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Caller's feed, newest first", body = NotificationListResponse)),
    security(("user_identity" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> impl IntoResponse {
    Json(NotificationListResponse {
        success: true,
        notifications: state.feed.list_for_user(&user.id),
    })
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    responses(
        (status = 200, description = "Notification marked read", body = NotificationResponse),
        (status = 404, description = "No owned notification with this id")
    ),
    security(("user_identity" = [])),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = state.feed.mark_read(&id, &user.id)?;
    Ok(Json(NotificationResponse {
        success: true,
        message: "Notification marked as read".into(),
        notification,
    }))
}

pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": format!("Route not found: {method} {}", uri.path()),
        })),
    )
}
