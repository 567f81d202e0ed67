//! Exercise tracker records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generate a store-side record identifier.
///
/// 32 lowercase hex characters.
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-generated identifier.
    pub id: String,

    /// Unique display name.
    pub username: String,
}

impl User {
    /// Create a user with a fresh identifier.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            username: username.into(),
        }
    }
}

/// Exercise fields supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    /// Owning user.
    pub user_id: String,
    /// What was done.
    pub description: String,
    /// Minutes spent.
    pub duration: u32,
    /// Calendar day of the session.
    pub date: NaiveDate,
}

/// A logged exercise session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Store-generated identifier.
    pub id: String,

    /// Owning user; checked against the user collection on insert only.
    pub user_id: String,

    /// What was done.
    pub description: String,

    /// Minutes spent.
    pub duration: u32,

    /// Calendar day of the session.
    pub date: NaiveDate,
}

impl From<NewExercise> for Exercise {
    fn from(new: NewExercise) -> Self {
        Self {
            id: new_record_id(),
            user_id: new.user_id,
            description: new.description,
            duration: new.duration,
            date: new.date,
        }
    }
}

/// Query over one user's exercise log.
///
/// Both date bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseFilter {
    /// Earliest date to include.
    pub from: Option<NaiveDate>,
    /// Latest date to include.
    pub to: Option<NaiveDate>,
    /// Maximum number of entries to return.
    pub limit: usize,
}

impl ExerciseFilter {
    /// Whether an exercise falls inside the date window.
    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.from.is_none_or(|from| exercise.date >= from)
            && self.to.is_none_or(|to| exercise.date <= to)
    }

    /// Apply the filter to exercises already scoped to one user, keeping their order.
    pub fn apply<'a, I>(&self, exercises: I) -> Vec<Exercise>
    where
        I: IntoIterator<Item = &'a Exercise>,
    {
        exercises
            .into_iter()
            .filter(|exercise| self.matches(exercise))
            .take(self.limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(day: u32) -> Exercise {
        NewExercise {
            user_id: "u1".to_string(),
            description: format!("run {day}"),
            duration: 30,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        }
        .into()
    }

    #[test]
    fn test_record_ids_are_unique_hex() {
        let a = new_record_id();
        let b = new_record_id();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        let log: Vec<Exercise> = (1..=5).map(exercise).collect();
        let filter = ExerciseFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 2),
            to: NaiveDate::from_ymd_opt(2024, 1, 4),
            limit: 100,
        };

        let days: Vec<String> = filter
            .apply(&log)
            .into_iter()
            .map(|e| e.description)
            .collect();
        assert_eq!(days, vec!["run 2", "run 3", "run 4"]);
    }

    #[test]
    fn test_filter_limit_keeps_order() {
        let log: Vec<Exercise> = (1..=5).map(exercise).collect();
        let filter = ExerciseFilter {
            from: None,
            to: None,
            limit: 2,
        };

        let picked = filter.apply(&log);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].description, "run 1");
        assert_eq!(picked[1].description, "run 2");
    }

    #[test]
    fn test_filter_with_inverted_window_matches_nothing() {
        let log: Vec<Exercise> = (1..=5).map(exercise).collect();
        let filter = ExerciseFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 4),
            to: NaiveDate::from_ymd_opt(2024, 1, 2),
            limit: 100,
        };
        assert!(filter.apply(&log).is_empty());
    }
}
