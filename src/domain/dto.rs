//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies arrive either as JSON or as url-encoded forms, so every
//! numeric field is read leniently and validated here before it reaches a
//! service.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{Exercise, ExerciseFilter, ShortUrl, User};

/// Human-readable date used in tracker responses, e.g. `Mon Jan 01 1990`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Parse an optional date field; blank counts as absent.
fn parse_optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .ok_or_else(|| format!("{field} must be a date (YYYY-MM-DD)")),
    }
}

/// Integer that may arrive as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    /// Numeric form.
    Int(i64),
    /// Textual form, e.g. from a url-encoded body.
    Text(String),
}

impl IntOrString {
    /// Interpret as an integer; text must be an integer after trimming.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

// ============== Tracker ==============

/// Request to register a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Desired username.
    #[serde(default)]
    pub username: String,
}

impl CreateUserRequest {
    /// Validate the request, returning the normalized username.
    ///
    /// # Errors
    ///
    /// Returns a message if the username is blank.
    pub fn validate(&self) -> Result<&str, String> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("username is required".to_string());
        }
        Ok(username)
    }
}

/// Request to log an exercise.
#[derive(Debug, Clone, Deserialize)]
pub struct AddExerciseRequest {
    /// What was done.
    #[serde(default)]
    pub description: Option<String>,

    /// Minutes spent.
    #[serde(default)]
    pub duration: Option<IntOrString>,

    /// Day of the session; today when absent.
    #[serde(default)]
    pub date: Option<String>,
}

/// Validated exercise fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseInput {
    /// What was done.
    pub description: String,
    /// Minutes spent.
    pub duration: u32,
    /// Explicit date, if supplied.
    pub date: Option<NaiveDate>,
}

impl AddExerciseRequest {
    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid field.
    pub fn validate(&self) -> Result<ExerciseInput, String> {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| "description is required".to_string())?;

        let duration = self
            .duration
            .as_ref()
            .ok_or_else(|| "duration is required".to_string())?
            .as_i64()
            .ok_or_else(|| "duration must be an integer".to_string())?;
        let duration = u32::try_from(duration)
            .map_err(|_| "duration must be a non-negative number of minutes".to_string())?;

        let date = parse_optional_date("date", self.date.as_deref())?;

        Ok(ExerciseInput {
            description: description.to_string(),
            duration,
            date,
        })
    }
}

/// Query parameters for a log lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
    /// Earliest date, inclusive.
    pub from: Option<String>,
    /// Latest date, inclusive.
    pub to: Option<String>,
    /// Maximum number of entries.
    pub limit: Option<String>,
}

impl LogQuery {
    /// Turn the query into a filter, capping the limit at `max_entries`.
    ///
    /// An absent or zero limit means "up to the cap".
    ///
    /// # Errors
    ///
    /// Returns a message if a date or the limit cannot be parsed.
    pub fn to_filter(&self, max_entries: usize) -> Result<ExerciseFilter, String> {
        let from = parse_optional_date("from", self.from.as_deref())?;
        let to = parse_optional_date("to", self.to.as_deref())?;

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => max_entries,
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => max_entries,
                Ok(n) => n.min(max_entries),
                Err(_) => return Err("limit must be a non-negative integer".to_string()),
            },
        };

        Ok(ExerciseFilter { from, to, limit })
    }
}

/// User as listed and as returned on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Username.
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Logged exercise together with its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    /// Owner identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Owner username.
    pub username: String,
    /// Formatted session date.
    pub date: String,
    /// Minutes spent.
    pub duration: u32,
    /// What was done.
    pub description: String,
}

impl ExerciseResponse {
    /// Combine a user with the exercise just stored for them.
    #[must_use]
    pub fn new(user: User, exercise: Exercise) -> Self {
        Self {
            id: user.id,
            username: user.username,
            date: format_date(exercise.date),
            duration: exercise.duration,
            description: exercise.description,
        }
    }
}

/// One projected log line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// What was done.
    pub description: String,
    /// Minutes spent.
    pub duration: u32,
    /// Formatted session date.
    pub date: String,
}

impl From<Exercise> for LogEntry {
    fn from(exercise: Exercise) -> Self {
        Self {
            description: exercise.description,
            duration: exercise.duration,
            date: format_date(exercise.date),
        }
    }
}

/// A user's filtered exercise log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogResponse {
    /// User identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Username.
    pub username: String,
    /// Lower bound echoed back, when one was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Upper bound echoed back, when one was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Number of entries in `log`.
    pub count: usize,
    /// The entries.
    pub log: Vec<LogEntry>,
}

impl LogResponse {
    /// Build the response for `user` from the exercises the filter selected.
    #[must_use]
    pub fn new(user: User, filter: &ExerciseFilter, exercises: Vec<Exercise>) -> Self {
        let log: Vec<LogEntry> = exercises.into_iter().map(LogEntry::from).collect();
        Self {
            id: user.id,
            username: user.username,
            from: filter.from.map(format_date),
            to: filter.to.map(format_date),
            count: log.len(),
            log,
        }
    }
}

// ============== Shortener ==============

/// Request to shorten a URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortenRequest {
    /// URL to shorten.
    #[serde(default)]
    pub url: String,
}

/// A shortened URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortUrlResponse {
    /// URL as submitted.
    pub original_url: String,
    /// Assigned short code.
    pub short_url: u64,
}

impl From<ShortUrl> for ShortUrlResponse {
    fn from(url: ShortUrl) -> Self {
        Self {
            original_url: url.original,
            short_url: url.short,
        }
    }
}

// ============== Health ==============

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,

    /// Service version.
    pub version: String,
}

/// Readiness check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Overall readiness status.
    pub ready: bool,

    /// Individual component statuses.
    pub components: ReadyComponents,
}

/// Component readiness statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyComponents {
    /// Storage backend status.
    pub storage: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise_request(duration: Option<IntOrString>, date: Option<&str>) -> AddExerciseRequest {
        AddExerciseRequest {
            description: Some("swim".to_string()),
            duration,
            date: date.map(ToString::to_string),
        }
    }

    #[test]
    fn test_format_date_matches_weekday_month_day_year() {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(format_date(date), "Mon Jan 01 1990");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(
            parse_date("2024-03-05T23:10:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_create_user_validation() {
        let req = CreateUserRequest {
            username: "  alice ".to_string(),
        };
        assert_eq!(req.validate().unwrap(), "alice");

        let req = CreateUserRequest {
            username: "   ".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_duration_accepts_number_and_numeric_text() {
        let input = exercise_request(Some(IntOrString::Text("30".to_string())), None)
            .validate()
            .unwrap();
        assert_eq!(input.duration, 30);
        assert_eq!(input.date, None);

        let input = exercise_request(Some(IntOrString::Int(45)), Some("2024-01-15"))
            .validate()
            .unwrap();
        assert_eq!(input.duration, 45);
        assert_eq!(input.date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_duration_rejects_non_numeric_and_negative() {
        let req = exercise_request(Some(IntOrString::Text("thirty".to_string())), None);
        assert_eq!(req.validate().unwrap_err(), "duration must be an integer");

        let req = exercise_request(Some(IntOrString::Int(-5)), None);
        assert!(req.validate().is_err());

        let req = exercise_request(None, None);
        assert_eq!(req.validate().unwrap_err(), "duration is required");
    }

    #[test]
    fn test_blank_date_means_today_and_bad_date_is_rejected() {
        let input = exercise_request(Some(IntOrString::Int(10)), Some(""))
            .validate()
            .unwrap();
        assert_eq!(input.date, None);

        let req = exercise_request(Some(IntOrString::Int(10)), Some("not-a-date"));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_int_or_string_from_json() {
        let v: IntOrString = serde_json::from_str("12").unwrap();
        assert_eq!(v.as_i64(), Some(12));
        let v: IntOrString = serde_json::from_str("\" 12 \"").unwrap();
        assert_eq!(v.as_i64(), Some(12));
        let v: IntOrString = serde_json::from_str("\"12abc\"").unwrap();
        assert_eq!(v.as_i64(), None);
    }

    #[test]
    fn test_log_query_limit_rules() {
        let query = LogQuery::default();
        assert_eq!(query.to_filter(1000).unwrap().limit, 1000);

        let query = LogQuery {
            limit: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filter(1000).unwrap().limit, 1000);

        let query = LogQuery {
            limit: Some("5".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filter(1000).unwrap().limit, 5);

        let query = LogQuery {
            limit: Some("5000".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filter(1000).unwrap().limit, 1000);

        let query = LogQuery {
            limit: Some("many".to_string()),
            ..Default::default()
        };
        assert!(query.to_filter(1000).is_err());
    }

    #[test]
    fn test_log_query_dates() {
        let query = LogQuery {
            from: Some("2024-01-01".to_string()),
            to: Some("2024-01-31".to_string()),
            limit: None,
        };
        let filter = query.to_filter(10).unwrap();
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.to, NaiveDate::from_ymd_opt(2024, 1, 31));

        let query = LogQuery {
            from: Some("garbage".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filter(10).unwrap_err(), "from must be a date (YYYY-MM-DD)");
    }

    #[test]
    fn test_log_response_counts_entries() {
        let user = User {
            id: "abc".to_string(),
            username: "alice".to_string(),
        };
        let exercise = Exercise {
            id: "e1".to_string(),
            user_id: "abc".to_string(),
            description: "row".to_string(),
            duration: 20,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        let filter = ExerciseFilter {
            from: None,
            to: None,
            limit: 10,
        };

        let response = LogResponse::new(user, &filter, vec![exercise]);
        assert_eq!(response.count, 1);
        assert_eq!(response.log[0].date, "Mon Jan 15 2024");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["_id"], "abc");
        assert!(json.get("from").is_none());
    }
}
