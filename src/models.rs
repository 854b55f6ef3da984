use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ClassStart,
    Booking,
    InstructorBooking,
}

/// A scheduled class. The participant roster is the source of truth for who
/// is enrolled; bookings are a secondary index over it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub id: String,
    /// User id of the instructor who created the class.
    pub instructor: String,
    pub instructor_name: String,
    pub category: String,
    pub exercise_type: String,
    #[schema(example = "2026-03-02")]
    pub date: String,
    #[schema(example = "10:00")]
    pub time: String,
    pub place: String,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A member's booking of a class, carrying copies of the schedule taken at
/// booking time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub class_id: String,
    pub class_name: String,
    pub exercise_type: String,
    /// Instructor display name as seen when the booking was made.
    pub instructor: String,
    pub date: String,
    pub time: String,
    pub place: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// One entry of the my-bookings listing. The instructor name prefers the live
/// class record over the copy stored on the booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: String,
    pub class_id: String,
    pub class_name: String,
    pub instructor: String,
    pub date: String,
    pub time: String,
    pub place: String,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
