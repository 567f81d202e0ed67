//! URL shortener handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::api::extractors::JsonOrForm;
use crate::api::state::AppState;
use crate::domain::{ShortUrlResponse, ShortenRequest};
use crate::error::{AppError, Result};

/// Shorten a URL.
pub async fn shorten(
    State(state): State<AppState>,
    JsonOrForm(request): JsonOrForm<ShortenRequest>,
) -> Result<Json<ShortUrlResponse>> {
    let short_url = state.shortener.shorten(&request.url).await?;

    Ok(Json(short_url.into()))
}

/// Redirect a short code to its original URL.
pub async fn redirect(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response> {
    let short = parse_code(&code)?;
    let short_url = state.shortener.resolve(short).await?;

    Ok((StatusCode::FOUND, [(LOCATION, short_url.original)]).into_response())
}

/// Short codes are positive integers.
fn parse_code(raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|code| *code > 0)
        .ok_or_else(|| AppError::BadRequest("Wrong format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("1").unwrap(), 1);
        assert_eq!(parse_code("42").unwrap(), 42);

        for bad in ["0", "-1", "abc", "1.5", ""] {
            assert!(matches!(parse_code(bad), Err(AppError::BadRequest(_))), "{bad}");
        }
    }
}
