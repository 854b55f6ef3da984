use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{
    BookClassPayload, BookingResponse, ClassListResponse, ClassPayload, ClassResponse,
    MessageResponse, MyBookingsResponse, NotificationListResponse, NotificationResponse,
};
use crate::models::{Booking, BookingStatus, BookingSummary, ClassRecord, Notification, NotificationKind};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "user_identity",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "x-user-id",
                "Caller identity injected by the auth middleware; \
                 x-user-name carries the display name",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::create_class,
        crate::handlers::list_classes,
        crate::handlers::update_class,
        crate::handlers::delete_class,
        crate::handlers::my_bookings,
        crate::handlers::book_class,
        crate::handlers::cancel_booking,
        crate::handlers::cancel_booking_by_class,
        crate::handlers::delete_booking,
        crate::handlers::list_notifications,
        crate::handlers::mark_notification_read
    ),
    components(schemas(
        ClassRecord,
        Booking,
        BookingStatus,
        BookingSummary,
        Notification,
        NotificationKind,
        ClassPayload,
        BookClassPayload,
        ClassResponse,
        ClassListResponse,
        BookingResponse,
        MyBookingsResponse,
        MessageResponse,
        NotificationListResponse,
        NotificationResponse
    )),
    tags(
        (name = "classes", description = "Class catalog and instructor scheduling"),
        (name = "bookings", description = "Booking and cancellation operations"),
        (name = "notifications", description = "Per-user notification feed")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
