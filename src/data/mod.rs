//! Core data models for the match feed
//!
//! Normalized shapes produced from the upstream provider's partial
//! responses: the match record served by the list regions, and the enriched
//! detail record assembled from up to four upstream calls.

pub mod enrich;
pub mod matches;
pub mod provider;

pub use matches::{current_bucket, extract_match_list, normalize_match, upcoming_bucket};
pub use provider::{CricApiClient, Endpoint, ProviderApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One innings line of a match score summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InningsScore {
    /// Runs scored
    pub runs: u32,
    /// Wickets fallen
    pub wickets: u32,
    /// Overs bowled
    pub overs: f64,
    /// Innings label, e.g. "India Inning 1"
    pub inning: String,
}

/// Normalized match record, classified each refresh into live or upcoming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Upstream match id
    pub id: String,
    /// Display name, usually "Team A vs Team B, Fixture"
    pub name: String,
    /// Participating team names in upstream order
    pub teams: Vec<String>,
    /// Whether play has started
    pub started: bool,
    /// Whether the match has ended
    pub ended: bool,
    /// Scheduled start in UTC, when the upstream supplied one
    pub date_time: Option<DateTime<Utc>>,
    /// Score summary per innings; empty before play starts
    pub score: Vec<InningsScore>,
    /// Free-text status line from upstream
    pub status: Option<String>,
    /// Venue, when supplied
    pub venue: Option<String>,
}

impl Match {
    /// Live classification: started and either still running or ended with
    /// a score actually recorded (abandoned fixtures end scoreless and are
    /// dropped).
    pub fn is_live(&self) -> bool {
        self.started && (!self.ended || !self.score.is_empty())
    }

    /// Upcoming classification: play not started yet
    pub fn is_upcoming(&self) -> bool {
        !self.started
    }
}

/// The combined read shape consumed by collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedMatches {
    /// Live matches, newest first, capped
    pub live: Vec<Match>,
    /// Upcoming matches in upstream order, capped
    pub upcoming: Vec<Match>,
}

/// One squad member as listed by the squad endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
    /// Player name
    pub name: String,
    /// Playing role, e.g. "Batsman", "Bowling Allrounder"
    pub role: Option<String>,
    /// Player image URL
    pub image: Option<String>,
}

/// One batter's line within an innings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatterLine {
    /// Batter name
    pub name: String,
    /// Runs scored
    pub runs: Option<u32>,
    /// Balls faced
    pub balls: Option<u32>,
    /// Fours hit
    pub fours: Option<u32>,
    /// Sixes hit
    pub sixes: Option<u32>,
    /// Strike rate
    pub strike_rate: Option<f64>,
    /// Dismissal description; absent or "not out" while batting
    pub dismissal: Option<String>,
}

impl BatterLine {
    /// True once the dismissal text names an actual dismissal
    pub fn is_dismissed(&self) -> bool {
        match &self.dismissal {
            Some(text) => {
                let text = text.trim().to_lowercase();
                !text.is_empty() && text != "not out" && text != "batting"
            }
            None => false,
        }
    }
}

/// One bowler's line within an innings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BowlerLine {
    /// Bowler name
    pub name: String,
    /// Overs bowled
    pub overs: Option<f64>,
    /// Maiden overs
    pub maidens: Option<u32>,
    /// Runs conceded
    pub runs_conceded: Option<u32>,
    /// Wickets taken
    pub wickets: Option<u32>,
    /// Economy rate
    pub economy: Option<f64>,
}

/// A player record merged from squad, live-score, scorecard, and match-info
/// sources, deduplicated case-insensitively by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Player name as first seen
    pub name: String,
    /// Image URL; squad-sourced, never overwritten by later sources
    pub image: Option<String>,
    /// Role; squad-sourced, never overwritten by later sources
    pub role: Option<String>,
    /// Runs scored
    pub runs: Option<u32>,
    /// Balls faced
    pub balls: Option<u32>,
    /// Fours hit
    pub fours: Option<u32>,
    /// Sixes hit
    pub sixes: Option<u32>,
    /// Strike rate
    pub strike_rate: Option<f64>,
    /// Dismissal description
    pub dismissal: Option<String>,
    /// Wickets taken
    pub wickets: Option<u32>,
    /// Overs bowled
    pub overs: Option<f64>,
    /// Runs conceded while bowling
    pub runs_conceded: Option<u32>,
    /// Bowling economy
    pub economy: Option<f64>,
}

/// Summary of the innings currently being batted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingSummary {
    /// Label of the selected innings
    pub inning: String,
    /// Batters not yet dismissed, in batting order
    pub batting: Vec<BatterLine>,
    /// Dismissed batters, most recent first, capped at five
    pub dismissed: Vec<BatterLine>,
    /// First squad member yet to appear in this innings' batting list.
    /// Best-effort guess, not a verified lineup decision.
    pub next_batter: Option<String>,
    /// The innings' first two bowlers
    pub bowlers: Vec<BowlerLine>,
}

/// Consolidated match detail built by the enricher. Squad, player, and
/// batting fields stay empty when the corresponding upstream calls fail;
/// the record is cached either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    /// The normalized match record from match-info
    pub info: Match,
    /// First listed team's full squad
    pub team1_squad: Vec<SquadMember>,
    /// Second listed team's full squad
    pub team2_squad: Vec<SquadMember>,
    /// First eleven squad members of team 1, by upstream list order.
    /// A documented heuristic, not a verified lineup.
    pub team1_playing_xi: Vec<String>,
    /// First eleven squad members of team 2, same heuristic
    pub team2_playing_xi: Vec<String>,
    /// Merged player records across all sources
    pub players: Vec<PlayerEntry>,
    /// Current innings summary, when any innings data was available
    pub batting: Option<BattingSummary>,
}

impl MatchDetail {
    /// A bare record carrying only the match-info fields
    pub fn bare(info: Match) -> Self {
        Self {
            info,
            team1_squad: Vec::new(),
            team2_squad: Vec::new(),
            team1_playing_xi: Vec::new(),
            team2_playing_xi: Vec::new(),
            players: Vec::new(),
            batting: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_record(started: bool, ended: bool, score: Vec<InningsScore>) -> Match {
        Match {
            id: "m1".to_string(),
            name: "A vs B".to_string(),
            teams: vec!["A".to_string(), "B".to_string()],
            started,
            ended,
            date_time: None,
            score,
            status: None,
            venue: None,
        }
    }

    fn innings_score() -> InningsScore {
        InningsScore {
            runs: 187,
            wickets: 6,
            overs: 20.0,
            inning: "A Inning 1".to_string(),
        }
    }

    #[test]
    fn test_started_unfinished_match_is_live() {
        let m = match_record(true, false, Vec::new());
        assert!(m.is_live());
        assert!(!m.is_upcoming());
    }

    #[test]
    fn test_ended_match_with_score_is_live() {
        let m = match_record(true, true, vec![innings_score()]);
        assert!(m.is_live());
    }

    #[test]
    fn test_ended_scoreless_match_is_neither() {
        let m = match_record(true, true, Vec::new());
        assert!(!m.is_live());
        assert!(!m.is_upcoming());
    }

    #[test]
    fn test_unstarted_match_is_upcoming() {
        let m = match_record(false, false, Vec::new());
        assert!(m.is_upcoming());
        assert!(!m.is_live());
    }

    #[test]
    fn test_batter_dismissal_text_variants() {
        let mut line = BatterLine {
            name: "R Sharma".to_string(),
            ..BatterLine::default()
        };
        assert!(!line.is_dismissed());

        line.dismissal = Some("not out".to_string());
        assert!(!line.is_dismissed());

        line.dismissal = Some("Batting".to_string());
        assert!(!line.is_dismissed());

        line.dismissal = Some("c Carey b Starc".to_string());
        assert!(line.is_dismissed());

        line.dismissal = Some("  ".to_string());
        assert!(!line.is_dismissed());
    }

    #[test]
    fn test_match_serialization_roundtrip() {
        let m = match_record(true, false, vec![innings_score()]);
        let json = serde_json::to_string(&m).expect("serialize Match");
        let back: Match = serde_json::from_str(&json).expect("deserialize Match");
        assert_eq!(back, m);
    }

    #[test]
    fn test_bare_detail_has_no_enrichment() {
        let detail = MatchDetail::bare(match_record(true, false, Vec::new()));
        assert!(detail.team1_squad.is_empty());
        assert!(detail.team2_squad.is_empty());
        assert!(detail.players.is_empty());
        assert!(detail.batting.is_none());
    }
}
