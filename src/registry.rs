use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::ClassRecord;
use crate::validation::require_fields;

/// Schedule fields shared by class creation and updates. The instructor is
/// never part of an update; it is fixed at creation.
#[derive(Debug, Clone)]
pub struct ClassFields {
    pub category: String,
    pub exercise_type: String,
    pub date: String,
    pub time: String,
    pub place: String,
}

/// Owns class records and their participant rosters.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RwLock<HashMap<String, ClassRecord>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &self,
        instructor_id: &str,
        instructor_name: &str,
        fields: ClassFields,
    ) -> Result<ClassRecord, CoreError> {
        require_fields(&[
            &fields.category,
            &fields.exercise_type,
            &fields.date,
            &fields.time,
            &fields.place,
        ])?;

        let record = ClassRecord {
            id: Uuid::new_v4().to_string(),
            instructor: instructor_id.to_string(),
            instructor_name: instructor_name.to_string(),
            category: fields.category,
            exercise_type: fields.exercise_type,
            date: fields.date,
            time: fields.time,
            place: fields.place,
            participants: Vec::new(),
            created_at: Utc::now(),
        };
        self.classes
            .write()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// All classes in creation order.
    pub fn list(&self) -> Vec<ClassRecord> {
        let mut classes: Vec<ClassRecord> = self.classes.read().values().cloned().collect();
        classes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        classes
    }

    pub fn get(&self, id: &str) -> Option<ClassRecord> {
        self.classes.read().get(id).cloned()
    }

    pub fn update(&self, id: &str, fields: ClassFields) -> Result<ClassRecord, CoreError> {
        require_fields(&[
            &fields.category,
            &fields.exercise_type,
            &fields.date,
            &fields.time,
            &fields.place,
        ])?;

        let mut classes = self.classes.write();
        let record = classes
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound("Class not found".into()))?;
        record.category = fields.category;
        record.exercise_type = fields.exercise_type;
        record.date = fields.date;
        record.time = fields.time;
        record.place = fields.place;
        Ok(record.clone())
    }

    /// Deletes a class. Bookings referencing it are left in place; listings
    /// and the reminder scanner tolerate the dangling reference.
    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        self.classes
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CoreError::NotFound("Class not found".into()))
    }

    /// Enrolls a user. Duplicate roster entries are rejected here, under the
    /// registry lock, not only by the caller's pre-check.
    pub fn add_participant(&self, class_id: &str, user_id: &str) -> Result<(), CoreError> {
        let mut classes = self.classes.write();
        let record = classes
            .get_mut(class_id)
            .ok_or_else(|| CoreError::NotFound("Class not found".into()))?;
        if record.participants.iter().any(|p| p == user_id) {
            return Err(CoreError::Conflict(
                "You have already booked this class".into(),
            ));
        }
        record.participants.push(user_id.to_string());
        Ok(())
    }

    /// Removing a non-member, or pulling from a deleted class, is a no-op.
    pub fn remove_participant(&self, class_id: &str, user_id: &str) {
        if let Some(record) = self.classes.write().get_mut(class_id) {
            record.participants.retain(|p| p != user_id);
        }
    }

    /// Ids of classes whose roster contains the user, in creation order.
    pub fn classes_with_participant(&self, user_id: &str) -> Vec<String> {
        self.list()
            .into_iter()
            .filter(|class| class.participants.iter().any(|p| p == user_id))
            .map(|class| class.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yoga_fields() -> ClassFields {
        ClassFields {
            category: "Wellness".into(),
            exercise_type: "Yoga".into(),
            date: "2026-03-02".into(),
            time: "10:00".into(),
            place: "Studio A".into(),
        }
    }

    #[test]
    fn test_create_requires_all_fields() {
        let registry = ClassRegistry::new();
        let mut fields = yoga_fields();
        fields.place = String::new();
        let err = registry.create("i-1", "Ewa", fields).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_update_unknown_class() {
        let registry = ClassRegistry::new();
        let err = registry.update("missing", yoga_fields()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_add_participant_rejects_duplicates() {
        let registry = ClassRegistry::new();
        let class = registry.create("i-1", "Ewa", yoga_fields()).unwrap();

        registry.add_participant(&class.id, "u-1").unwrap();
        let err = registry.add_participant(&class.id, "u-1").unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(registry.get(&class.id).unwrap().participants, vec!["u-1"]);
    }

    #[test]
    fn test_remove_participant_is_idempotent() {
        let registry = ClassRegistry::new();
        let class = registry.create("i-1", "Ewa", yoga_fields()).unwrap();

        registry.add_participant(&class.id, "u-1").unwrap();
        registry.remove_participant(&class.id, "u-1");
        registry.remove_participant(&class.id, "u-1");
        registry.remove_participant("missing-class", "u-1");
        assert!(registry.get(&class.id).unwrap().participants.is_empty());
    }

    #[test]
    fn test_delete_unknown_class() {
        let registry = ClassRegistry::new();
        assert!(matches!(
            registry.delete("missing"),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_classes_with_participant() {
        let registry = ClassRegistry::new();
        let first = registry.create("i-1", "Ewa", yoga_fields()).unwrap();
        let second = registry.create("i-2", "Jan", yoga_fields()).unwrap();

        registry.add_participant(&first.id, "u-1").unwrap();
        registry.add_participant(&second.id, "u-2").unwrap();

        assert_eq!(registry.classes_with_participant("u-1"), vec![first.id]);
        assert!(registry.classes_with_participant("u-3").is_empty());
    }
}
