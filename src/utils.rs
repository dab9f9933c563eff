use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, NaiveDate};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{DatePrecision, ReleaseKind, ReleaseKinds};

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_state() -> String {
    random_alphanumeric(32)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn infer_date_precision(raw: &str) -> DatePrecision {
    match raw.matches('-').count() {
        0 => DatePrecision::Year,
        1 => DatePrecision::Month,
        _ => DatePrecision::Day,
    }
}

/// Parses a Spotify release date at the given precision.
///
/// `"2024"` becomes 2024-01-01 and `"2024-05"` becomes 2024-05-01.
pub fn parse_release_date(raw: &str, precision: DatePrecision) -> Result<NaiveDate, String> {
    let invalid = || format!("invalid {precision:?} release date `{raw}`");

    match precision {
        DatePrecision::Year => {
            let year = raw.trim().parse::<i32>().map_err(|_| invalid())?;
            NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)
        }
        DatePrecision::Month => {
            let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
            let year = year.parse::<i32>().map_err(|_| invalid())?;
            let month = month.parse::<u32>().map_err(|_| invalid())?;
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
        }
        DatePrecision::Day => {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| invalid())
        }
    }
}

/// The exclusive lower bound of the recency window: releases must be dated
/// strictly after it.
pub fn recency_cutoff(today: NaiveDate, weeks: u32) -> NaiveDate {
    today - Duration::weeks(weeks as i64)
}

/// Parses a `YYYY-MM-DD` day, as accepted by `--as-of`.
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| format!("`{input}` is not a YYYY-MM-DD date: {e}"))
}

/// Extracts a playlist id from a bare id, a `spotify:playlist:` URI or an
/// `open.spotify.com/playlist/` URL.
pub fn parse_playlist_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let id = if let Some(rest) = input.strip_prefix("spotify:playlist:") {
        rest
    } else if let Some(pos) = input.find("/playlist/") {
        let rest = &input[pos + "/playlist/".len()..];
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else {
        input
    };

    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(id.to_string())
    } else {
        None
    }
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

pub fn parse_release_kinds(input: &str) -> Result<ReleaseKinds, String> {
    let kinds = input
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<ReleaseKind>)
        .collect::<Result<Vec<_>, _>>()?;

    if kinds.is_empty() {
        return Err("at least one release type is required".to_string());
    }

    Ok(ReleaseKinds::new(kinds))
}
