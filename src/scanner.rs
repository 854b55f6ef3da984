use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::CoreError;
use crate::feed::NotificationFeed;
use crate::ledger::BookingLedger;
use crate::models::NotificationKind;
use crate::registry::ClassRegistry;

/// Reminders fire for classes starting within this many minutes; the same
/// span bounds the duplicate lookback.
const REMINDER_WINDOW_MINS: i64 = 5;

/// Periodic job that reads the ledger and registry and writes class-start
/// reminders to the feed.
pub struct ReminderScanner {
    ledger: Arc<BookingLedger>,
    registry: Arc<ClassRegistry>,
    feed: Arc<NotificationFeed>,
}

impl ReminderScanner {
    pub fn new(
        ledger: Arc<BookingLedger>,
        registry: Arc<ClassRegistry>,
        feed: Arc<NotificationFeed>,
    ) -> Self {
        Self {
            ledger,
            registry,
            feed,
        }
    }

    /// Starts the periodic tick. Ticks run back to back on a single task, so
    /// a scan never overlaps itself. Abort the handle to stop the schedule.
    pub fn spawn(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.check_starting_classes();
            }
        })
    }

    /// One scheduler tick. Failures are logged and swallowed; the scanner has
    /// no caller to report to, and a failed tick simply emits nothing.
    pub fn check_starting_classes(&self) {
        match self.scan(Utc::now()) {
            Ok(0) => {}
            Ok(sent) => debug!(sent, "emitted class start reminders"),
            Err(err) => error!(error = %err, "reminder scan failed"),
        }
    }

    /// Emits a reminder for every active booking whose class starts within
    /// the next five minutes, unless one for the same (user, class) was
    /// already written in the last five. Returns how many were written.
    pub fn scan(&self, now: DateTime<Utc>) -> Result<usize, CoreError> {
        let window_end = now + ChronoDuration::minutes(REMINDER_WINDOW_MINS);
        let lookback = now - ChronoDuration::minutes(REMINDER_WINDOW_MINS);
        let mut sent = 0;

        for booking in self.ledger.active_bookings() {
            // bookings can outlive their class; skip those
            let Some(class) = self.registry.get(&booking.class_id) else {
                continue;
            };
            let Some(start) = class_start(&class.date, &class.time) else {
                continue;
            };
            if start <= now || start > window_end {
                continue;
            }
            if self
                .feed
                .has_recent_class_start(&booking.user_id, &booking.class_id, lookback)
            {
                continue;
            }

            self.feed.notify(
                &booking.user_id,
                "Class Starting Soon",
                &format!(
                    "Your class \"{}\" is starting in 5 minutes!",
                    booking.class_name
                ),
                NotificationKind::ClassStart,
                Some(&booking.class_id),
            );
            sent += 1;
        }

        Ok(sent)
    }
}

/// Resolves a schedule's `YYYY-MM-DD` and `HH:MM[:SS]` strings against local
/// time. Unparseable or DST-ambiguous schedules resolve to [None].
fn class_start(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = time.trim();
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    Local
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
        .map(|local| local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::BookingRequest;
    use crate::registry::ClassFields;

    fn setup() -> (
        Arc<ClassRegistry>,
        Arc<NotificationFeed>,
        Arc<BookingLedger>,
        ReminderScanner,
    ) {
        let registry = Arc::new(ClassRegistry::new());
        let feed = Arc::new(NotificationFeed::new());
        let ledger = Arc::new(BookingLedger::new(registry.clone(), feed.clone()));
        let scanner = ReminderScanner::new(ledger.clone(), registry.clone(), feed.clone());
        (registry, feed, ledger, scanner)
    }

    /// Creates a class starting `minutes_ahead` from now (local time) and
    /// books it for `user_id`.
    fn book_class_starting_in(
        registry: &ClassRegistry,
        ledger: &BookingLedger,
        user_id: &str,
        minutes_ahead: i64,
    ) -> String {
        let start = Local::now() + ChronoDuration::minutes(minutes_ahead);
        let class = registry
            .create(
                "i-1",
                "Ewa",
                ClassFields {
                    category: "Wellness".into(),
                    exercise_type: "Yoga".into(),
                    date: start.format("%Y-%m-%d").to_string(),
                    time: start.format("%H:%M").to_string(),
                    place: "Studio A".into(),
                },
            )
            .unwrap();
        ledger
            .book_class(
                user_id,
                "Anna",
                BookingRequest {
                    class_id: class.id.clone(),
                    class_name: "Yoga".into(),
                    date: class.date.clone(),
                    time: class.time.clone(),
                    place: "Studio A".into(),
                    exercise_type: "Yoga".into(),
                    instructor: None,
                },
            )
            .unwrap();
        class.id
    }

    fn class_start_count(feed: &NotificationFeed, user_id: &str) -> usize {
        feed.list_for_user(user_id)
            .iter()
            .filter(|n| n.kind == NotificationKind::ClassStart)
            .count()
    }

    #[test]
    fn test_class_start_parsing() {
        assert!(class_start("2026-03-02", "10:00").is_some());
        assert!(class_start("2026-03-02", "10:00:30").is_some());
        assert!(class_start("02.03.2026", "10:00").is_none());
        assert!(class_start("2026-03-02", "ten").is_none());
        assert!(class_start("", "").is_none());
    }

    #[test]
    fn test_reminder_sent_once_within_window() {
        let (registry, feed, ledger, scanner) = setup();
        book_class_starting_in(&registry, &ledger, "u-1", 4);

        assert_eq!(scanner.scan(Utc::now()).unwrap(), 1);
        assert_eq!(class_start_count(&feed, "u-1"), 1);

        // a second tick inside the lookback window stays silent
        assert_eq!(scanner.scan(Utc::now()).unwrap(), 0);
        assert_eq!(class_start_count(&feed, "u-1"), 1);
    }

    #[test]
    fn test_no_reminder_outside_window() {
        let (registry, feed, ledger, scanner) = setup();
        book_class_starting_in(&registry, &ledger, "u-1", 10);

        assert_eq!(scanner.scan(Utc::now()).unwrap(), 0);
        assert_eq!(class_start_count(&feed, "u-1"), 0);
    }

    #[test]
    fn test_no_reminder_for_started_class() {
        let (registry, feed, ledger, scanner) = setup();
        book_class_starting_in(&registry, &ledger, "u-1", -3);

        assert_eq!(scanner.scan(Utc::now()).unwrap(), 0);
        assert_eq!(class_start_count(&feed, "u-1"), 0);
    }

    #[test]
    fn test_deleted_class_is_skipped() {
        let (registry, feed, ledger, scanner) = setup();
        let class_id = book_class_starting_in(&registry, &ledger, "u-1", 4);
        registry.delete(&class_id).unwrap();

        assert_eq!(scanner.scan(Utc::now()).unwrap(), 0);
        assert_eq!(class_start_count(&feed, "u-1"), 0);
    }

    #[test]
    fn test_each_booked_user_gets_a_reminder() {
        let (registry, feed, ledger, scanner) = setup();
        let class_id = book_class_starting_in(&registry, &ledger, "u-1", 4);
        let class = registry.get(&class_id).unwrap();
        ledger
            .book_class(
                "u-2",
                "Piotr",
                BookingRequest {
                    class_id: class_id.clone(),
                    class_name: "Yoga".into(),
                    date: class.date,
                    time: class.time,
                    place: "Studio A".into(),
                    exercise_type: "Yoga".into(),
                    instructor: None,
                },
            )
            .unwrap();

        assert_eq!(scanner.scan(Utc::now()).unwrap(), 2);
        assert_eq!(class_start_count(&feed, "u-1"), 1);
        assert_eq!(class_start_count(&feed, "u-2"), 1);
    }
}
