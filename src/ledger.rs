use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::CoreError;
use crate::feed::NotificationFeed;
use crate::models::{Booking, BookingStatus, BookingSummary, NotificationKind};
use crate::registry::ClassRegistry;
use crate::validation::require_fields;

/// Everything a booking request carries. The schedule copies are denormalized
/// onto the booking row; `instructor` is an optional display-name override.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub class_id: String,
    pub class_name: String,
    pub date: String,
    pub time: String,
    pub place: String,
    pub exercise_type: String,
    pub instructor: Option<String>,
}

/// Booking records per (user, class), kept in lockstep with the registry's
/// participant rosters.
pub struct BookingLedger {
    bookings: RwLock<HashMap<String, Booking>>,
    registry: Arc<ClassRegistry>,
    feed: Arc<NotificationFeed>,
}

impl BookingLedger {
    pub fn new(registry: Arc<ClassRegistry>, feed: Arc<NotificationFeed>) -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
            registry,
            feed,
        }
    }

    pub fn book_class(
        &self,
        user_id: &str,
        user_name: &str,
        request: BookingRequest,
    ) -> Result<Booking, CoreError> {
        require_fields(&[
            &request.class_id,
            &request.class_name,
            &request.date,
            &request.time,
            &request.place,
            &request.exercise_type,
        ])?;

        let class = self
            .registry
            .get(&request.class_id)
            .ok_or_else(|| CoreError::NotFound("Class not found".into()))?;
        if class.instructor.trim().is_empty() {
            return Err(CoreError::Validation(
                "Class has no instructor assigned".into(),
            ));
        }
        if class.participants.iter().any(|p| p == user_id) {
            return Err(CoreError::Conflict(
                "You have already booked this class".into(),
            ));
        }

        let instructor = request
            .instructor
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                (!class.instructor_name.trim().is_empty()).then(|| class.instructor_name.clone())
            })
            .unwrap_or_else(|| "Unknown Instructor".to_string());

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            class_id: request.class_id.clone(),
            class_name: request.class_name,
            exercise_type: request.exercise_type,
            instructor,
            date: request.date,
            time: request.time,
            place: request.place,
            status: BookingStatus::Booked,
            created_at: Utc::now(),
        };

        {
            let mut bookings = self.bookings.write();
            // the roster pre-check above races with concurrent requests; the
            // uniqueness check under this lock is what guards the pair
            let duplicate = bookings.values().any(|existing| {
                existing.user_id == user_id
                    && existing.class_id == booking.class_id
                    && existing.status == BookingStatus::Booked
            });
            if duplicate {
                return Err(CoreError::Conflict(
                    "You have already booked this class".into(),
                ));
            }
            bookings.insert(booking.id.clone(), booking.clone());
        }

        // the roster is the enrollment source of truth; if it refuses, take
        // the booking row back out so the two stores cannot disagree
        if let Err(err) = self.registry.add_participant(&booking.class_id, user_id) {
            self.bookings.write().remove(&booking.id);
            return Err(err);
        }

        self.feed.notify(
            user_id,
            "Class Booked Successfully",
            &format!(
                "You have successfully booked {} class for {} at {}",
                booking.class_name, booking.date, booking.time
            ),
            NotificationKind::Booking,
            Some(&booking.class_id),
        );
        self.feed.notify(
            &class.instructor,
            "🎉 New Class Booking",
            &format!(
                "{} has booked your {} class scheduled for {} at {}",
                user_name, booking.class_name, booking.date, booking.time
            ),
            NotificationKind::InstructorBooking,
            Some(&booking.class_id),
        );

        Ok(booking)
    }

    /// Cancels an active booking by its id. The row is deleted outright.
    pub fn cancel_booking(&self, booking_id: &str, user_id: &str) -> Result<(), CoreError> {
        let booking = self
            .bookings
            .read()
            .get(booking_id)
            .filter(|b| b.user_id == user_id && b.status == BookingStatus::Booked)
            .cloned()
            .ok_or_else(|| CoreError::NotFound("Booking not found".into()))?;

        self.registry.remove_participant(&booking.class_id, user_id);
        self.feed.notify(
            user_id,
            "Class Cancelled",
            &format!(
                "You have cancelled your booking for {} on {} at {}",
                booking.class_name, booking.date, booking.time
            ),
            NotificationKind::Booking,
            Some(&booking.class_id),
        );
        self.bookings.write().remove(&booking.id);
        Ok(())
    }

    /// Cancels the user's active booking of a class. The row is kept and
    /// flipped to cancelled, unlike [`Self::cancel_booking`].
    pub fn cancel_booking_by_class(
        &self,
        class_id: &str,
        user_id: &str,
    ) -> Result<Booking, CoreError> {
        let booking_id = self
            .bookings
            .read()
            .values()
            .find(|b| {
                b.class_id == class_id && b.user_id == user_id && b.status == BookingStatus::Booked
            })
            .map(|b| b.id.clone())
            .ok_or_else(|| CoreError::NotFound("Booking not found".into()))?;

        self.registry.remove_participant(class_id, user_id);

        let mut bookings = self.bookings.write();
        let booking = bookings
            .get_mut(&booking_id)
            .ok_or_else(|| CoreError::NotFound("Booking not found".into()))?;
        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    /// Deletes any booking matching id and owner regardless of status, then
    /// pulls the user from the roster. Tolerates a missing class.
    pub fn delete_booking(&self, booking_id: &str, user_id: &str) -> Result<(), CoreError> {
        let booking = {
            let mut bookings = self.bookings.write();
            match bookings.get(booking_id) {
                Some(b) if b.user_id == user_id => bookings.remove(booking_id),
                _ => None,
            }
        }
        .ok_or_else(|| CoreError::NotFound("Booking not found".into()))?;

        self.registry.remove_participant(&booking.class_id, user_id);
        Ok(())
    }

    /// Active bookings most-recent-first, plus the union of class ids from
    /// bookings and from rosters already containing the user. The union covers
    /// roster entries whose booking row went missing.
    pub fn list_my_bookings(&self, user_id: &str) -> (Vec<BookingSummary>, Vec<String>) {
        let mut active: Vec<Booking> = self
            .bookings
            .read()
            .values()
            .filter(|b| b.user_id == user_id && b.status == BookingStatus::Booked)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let summaries = active
            .iter()
            .map(|booking| BookingSummary {
                id: booking.id.clone(),
                class_id: booking.class_id.clone(),
                class_name: booking.class_name.clone(),
                instructor: self
                    .registry
                    .get(&booking.class_id)
                    .map(|class| class.instructor_name)
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| booking.instructor.clone()),
                date: booking.date.clone(),
                time: booking.time.clone(),
                place: booking.place.clone(),
                status: booking.status,
            })
            .collect();

        let mut booked_class_ids: Vec<String> = Vec::new();
        for class_id in active
            .iter()
            .map(|b| b.class_id.clone())
            .chain(self.registry.classes_with_participant(user_id))
        {
            if !booked_class_ids.contains(&class_id) {
                booked_class_ids.push(class_id);
            }
        }

        (summaries, booked_class_ids)
    }

    /// Every booking still in the booked state, for the reminder scanner.
    pub fn active_bookings(&self) -> Vec<Booking> {
        self.bookings
            .read()
            .values()
            .filter(|b| b.status == BookingStatus::Booked)
            .cloned()
            .collect()
    }
}
