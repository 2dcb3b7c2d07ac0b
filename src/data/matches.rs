//! Raw match payload normalization and classification
//!
//! Upstream payload shapes vary between endpoints and provider versions:
//! the list may arrive bare or under a wrapper key, field names differ, and
//! numbers sometimes arrive as strings. Each accessor here is an ordered
//! list of extraction strategies tried in sequence; the first match wins.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use super::{InningsScore, Match};

/// Pulls the match list out of a list-endpoint payload.
///
/// Strategies, in order: the payload is itself an array; an array under
/// `matches`; under `data`; under `results`; under `list`. Anything else
/// yields an empty list.
pub fn extract_match_list(data: &Value) -> Vec<Value> {
    if let Some(items) = data.as_array() {
        return items.clone();
    }
    for key in ["matches", "data", "results", "list"] {
        if let Some(items) = data.get(key).and_then(Value::as_array) {
            return items.clone();
        }
    }
    Vec::new()
}

/// First string found under any of `keys`
pub(crate) fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First boolean found under any of `keys`
pub(crate) fn first_bool(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(Value::as_bool)
}

/// First count found under any of `keys`; accepts numbers and numeric
/// strings, which the provider mixes freely
pub(crate) fn first_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    keys.iter().filter_map(|key| value.get(key)).find_map(|v| {
        v.as_u64()
            .map(|n| n as u32)
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

/// First float found under any of `keys`; accepts numbers and numeric
/// strings
pub(crate) fn first_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|key| value.get(key)).find_map(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

/// Parses the provider's GMT timestamp, tried as naive `%Y-%m-%dT%H:%M:%S`
/// first (the documented format), then as RFC 3339
fn parse_date_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Team names, either as a bare string array under `teams` or as
/// `teamInfo` objects carrying a `name`
fn extract_teams(raw: &Value) -> Vec<String> {
    if let Some(teams) = raw.get("teams").and_then(Value::as_array) {
        let names: Vec<String> = teams
            .iter()
            .filter_map(|t| t.as_str())
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            return names;
        }
    }
    if let Some(infos) = raw.get("teamInfo").and_then(Value::as_array) {
        return infos
            .iter()
            .filter_map(|t| first_str(t, &["name", "shortname"]))
            .collect();
    }
    Vec::new()
}

/// Score summary lines under `score`; entries use either the short
/// (`r`/`w`/`o`) or long (`runs`/`wickets`/`overs`) field names
fn extract_score(raw: &Value) -> Vec<InningsScore> {
    let Some(entries) = raw.get("score").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let runs = first_u32(entry, &["r", "runs"])?;
            Some(InningsScore {
                runs,
                wickets: first_u32(entry, &["w", "wickets"]).unwrap_or(0),
                overs: first_f64(entry, &["o", "overs"]).unwrap_or(0.0),
                inning: first_str(entry, &["inning", "title"]).unwrap_or_default(),
            })
        })
        .collect()
}

/// Normalizes one raw match object. Returns `None` when no id can be
/// extracted; such entries are unusable downstream and get dropped.
pub fn normalize_match(raw: &Value) -> Option<Match> {
    let id = first_str(raw, &["id", "match_id", "matchId"])?;
    Some(Match {
        id,
        name: first_str(raw, &["name", "title"]).unwrap_or_default(),
        teams: extract_teams(raw),
        started: first_bool(raw, &["matchStarted", "started"]).unwrap_or(false),
        ended: first_bool(raw, &["matchEnded", "ended"]).unwrap_or(false),
        date_time: first_str(raw, &["dateTimeGMT", "dateTime", "date_time"])
            .and_then(|s| parse_date_time(&s)),
        score: extract_score(raw),
        status: first_str(raw, &["status"]),
        venue: first_str(raw, &["venue"]),
    })
}

/// The Current region contents: live matches sorted descending by start
/// time, capped at `cap`
pub fn current_bucket(matches: Vec<Match>, cap: usize) -> Vec<Match> {
    let mut current: Vec<Match> = matches.into_iter().filter(Match::is_live).collect();
    current.sort_by(|a, b| b.date_time.cmp(&a.date_time));
    current.truncate(cap);
    current
}

/// The Upcoming region contents: unstarted matches in upstream order,
/// capped at `cap`
pub fn upcoming_bucket(matches: Vec<Match>, cap: usize) -> Vec<Match> {
    let mut upcoming: Vec<Match> = matches.into_iter().filter(Match::is_upcoming).collect();
    upcoming.truncate(cap);
    upcoming
}
