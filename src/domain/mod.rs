//! Domain models.
//!
//! Records kept by the store (users, exercises, short URLs, sequences) and
//! the API contracts built from them.

pub mod dto;
pub mod sequence;
pub mod tracker;
pub mod url;

pub use dto::{
    AddExerciseRequest, CreateUserRequest, ExerciseInput, ExerciseResponse, HealthResponse,
    IntOrString, LogEntry, LogQuery, LogResponse, ReadyComponents, ReadyResponse,
    ShortUrlResponse, ShortenRequest, UserResponse, format_date, parse_date,
};
pub use sequence::SequenceState;
pub use tracker::{Exercise, ExerciseFilter, NewExercise, User, new_record_id};
pub use url::{ShortUrl, is_valid_url};
