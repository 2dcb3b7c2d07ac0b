//! Match detail enrichment
//!
//! Builds one consolidated match-detail record from up to four upstream
//! calls: match-info, squads, and a scorecard with an alternately-named
//! fallback endpoint. Player records are extracted independently from the
//! live score innings, the scorecard innings, and the raw match-info player
//! list, then merged into one map keyed by case-insensitive name. Only the
//! match-info call is required; every other step degrades to a partially
//! enriched or bare record, which is cached either way.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, info};

use crate::data::matches::{first_bool, first_f64, first_str, first_u32, normalize_match};
use crate::data::provider::Endpoint;
use crate::data::{BatterLine, BattingSummary, BowlerLine, MatchDetail, PlayerEntry, SquadMember};
use crate::error::FeedError;
use crate::refresh::fetch_with_rotation;
use crate::service::ServiceInner;

/// Squad size used for the playing-XI guess
const PLAYING_XI_SIZE: usize = 11;

/// Dismissed batters kept in the batting summary
const DISMISSED_CAP: usize = 5;

/// Bowlers kept in the batting summary
const BOWLER_CAP: usize = 2;

/// One team's squad as listed by the squad endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSquad {
    /// Team name
    pub name: String,
    /// Squad members in upstream list order
    pub players: Vec<SquadMember>,
}

/// One innings extracted from a live score or scorecard payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInning {
    /// Innings label
    pub name: String,
    /// Batting lines in batting order
    pub batting: Vec<BatterLine>,
    /// Bowling lines in bowling order
    pub bowling: Vec<BowlerLine>,
}

/// Serves the Match Detail region: cache-first, fetch on miss or
/// staleness, last-known-good on any failure.
///
/// # Errors
/// Propagates the underlying fetch error only when no cached value of any
/// kind exists for `id` — a true cold miss.
pub(crate) async fn match_details(
    inner: &ServiceInner,
    id: &str,
) -> Result<MatchDetail, FeedError> {
    if let Some(entry) = inner.cache.detail(id).await {
        if !entry.is_stale(inner.config.match_detail_ttl) {
            return Ok(entry.payload);
        }
    }

    match build_detail(inner, id).await {
        Ok(detail) => Ok(detail),
        Err(err) => match inner.cache.detail(id).await {
            Some(entry) => {
                debug!(
                    match_id = id,
                    error = %err,
                    "detail refresh failed, serving last-known-good"
                );
                Ok(entry.payload)
            }
            None => Err(err),
        },
    }
}

/// Runs the full enrichment pipeline for one match id and stores the
/// result. Match-info is the only fatal step; squad and scorecard failures
/// leave their fields empty.
async fn build_detail(inner: &ServiceInner, id: &str) -> Result<MatchDetail, FeedError> {
    let info = fetch_with_rotation(inner, Endpoint::MatchInfo, &[("id", id)]).await?;
    let base = normalize_match(&info)
        .ok_or_else(|| FeedError::MissingField(format!("match {id} info carried no id")))?;

    let squads = if squad_available(&info) {
        match fetch_with_rotation(inner, Endpoint::MatchSquad, &[("id", id)]).await {
            Ok(data) => extract_squads(&data),
            Err(err) => {
                debug!(match_id = id, error = %err, "squad fetch failed, continuing without");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let live_innings = extract_innings(&info);
    let scorecard_innings = fetch_scorecard_innings(inner, id).await;
    let info_players = extract_info_players(&info);

    let team1_squad = squads.first().map(|s| s.players.clone()).unwrap_or_default();
    let team2_squad = squads.get(1).map(|s| s.players.clone()).unwrap_or_default();
    let squad_order: Vec<String> = squads
        .iter()
        .flat_map(|s| s.players.iter().map(|p| p.name.clone()))
        .collect();

    let innings = if live_innings.is_empty() {
        &scorecard_innings
    } else {
        &live_innings
    };
    let batting = batting_summary(innings, &squad_order);
    let players = merge_players(&squads, &live_innings, &scorecard_innings, &info_players);

    let detail = MatchDetail {
        info: base,
        team1_playing_xi: playing_xi_guess(&team1_squad),
        team2_playing_xi: playing_xi_guess(&team2_squad),
        team1_squad,
        team2_squad,
        players,
        batting,
    };

    inner.cache.set_detail(id, detail.clone()).await;
    info!(
        match_id = id,
        players = detail.players.len(),
        enriched = !detail.team1_squad.is_empty() || detail.batting.is_some(),
        "match detail stored"
    );
    Ok(detail)
}

/// Primary scorecard fetch, falling back to the alternately-named endpoint
/// when the first yields nothing. Both failures are non-fatal.
async fn fetch_scorecard_innings(inner: &ServiceInner, id: &str) -> Vec<RawInning> {
    match fetch_with_rotation(inner, Endpoint::MatchScorecard, &[("id", id)]).await {
        Ok(data) => {
            let innings = extract_innings(&data);
            if !innings.is_empty() {
                return innings;
            }
        }
        Err(err) => {
            debug!(match_id = id, error = %err, "primary scorecard fetch failed");
        }
    }

    match fetch_with_rotation(inner, Endpoint::MatchScorecardAlt, &[("id", id)]).await {
        Ok(data) => extract_innings(&data),
        Err(err) => {
            debug!(match_id = id, error = %err, "fallback scorecard fetch failed");
            Vec::new()
        }
    }
}

/// Whether the match-info payload declares that squads can be fetched
pub fn squad_available(info: &Value) -> bool {
    first_bool(info, &["hasSquad", "has_squad", "squadAvailable"]).unwrap_or(false)
}

/// A name that may arrive as a bare string, an object with a `name` field,
/// or nested one level under one of `keys`
fn person_name(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(field) = value.get(key) {
            if let Some(name) = field.as_str() {
                let name = name.trim();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
            if let Some(name) = field.get("name").and_then(Value::as_str) {
                let name = name.trim();
                if !name.is_empty() {
                    return Some(name.to_string());
                }
            }
        }
    }
    None
}

fn parse_squad_member(value: &Value) -> Option<SquadMember> {
    if let Some(name) = value.as_str() {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        return Some(SquadMember {
            name: name.to_string(),
            role: None,
            image: None,
        });
    }
    let name = first_str(value, &["name"])?;
    Some(SquadMember {
        name,
        role: first_str(value, &["role"]),
        image: first_str(value, &["playerImg", "image", "img"]),
    })
}

/// Per-team squads from a squad-endpoint payload. Strategies: a bare array
/// of team objects, or the same under `squad` or `teams`.
pub fn extract_squads(data: &Value) -> Vec<TeamSquad> {
    let teams = data
        .as_array()
        .or_else(|| data.get("squad").and_then(Value::as_array))
        .or_else(|| data.get("teams").and_then(Value::as_array));
    let Some(teams) = teams else {
        return Vec::new();
    };

    teams
        .iter()
        .map(|team| TeamSquad {
            name: first_str(team, &["teamName", "name"]).unwrap_or_default(),
            players: team
                .get("players")
                .and_then(Value::as_array)
                .map(|players| players.iter().filter_map(parse_squad_member).collect())
                .unwrap_or_default(),
        })
        .collect()
}

/// First eleven squad members by upstream list order. A best-effort guess
/// at the playing XI, not a verified lineup.
pub fn playing_xi_guess(squad: &[SquadMember]) -> Vec<String> {
    squad
        .iter()
        .take(PLAYING_XI_SIZE)
        .map(|member| member.name.clone())
        .collect()
}

fn parse_batter(value: &Value) -> Option<BatterLine> {
    let name = person_name(value, &["batsman", "name"])?;
    Some(BatterLine {
        name,
        runs: first_u32(value, &["r", "runs"]),
        balls: first_u32(value, &["b", "balls"]),
        fours: first_u32(value, &["4s", "fours"]),
        sixes: first_u32(value, &["6s", "sixes"]),
        strike_rate: first_f64(value, &["sr", "strikeRate", "strike_rate"]),
        dismissal: first_str(value, &["dismissal", "dismissal-text", "dismissalText", "outDesc"]),
    })
}

fn parse_bowler(value: &Value) -> Option<BowlerLine> {
    let name = person_name(value, &["bowler", "name"])?;
    Some(BowlerLine {
        name,
        overs: first_f64(value, &["o", "overs"]),
        maidens: first_u32(value, &["m", "maidens"]),
        runs_conceded: first_u32(value, &["r", "runs"]),
        wickets: first_u32(value, &["w", "wickets"]),
        economy: first_f64(value, &["eco", "economy"]),
    })
}

fn parse_inning(value: &Value) -> RawInning {
    let batting = value
        .get("batting")
        .or_else(|| value.get("batsmen"))
        .and_then(Value::as_array)
        .map(|lines| lines.iter().filter_map(parse_batter).collect())
        .unwrap_or_default();
    let bowling = value
        .get("bowling")
        .or_else(|| value.get("bowlers"))
        .and_then(Value::as_array)
        .map(|lines| lines.iter().filter_map(parse_bowler).collect())
        .unwrap_or_default();
    RawInning {
        name: first_str(value, &["inning", "name", "title"]).unwrap_or_default(),
        batting,
        bowling,
    }
}

/// Innings from a live score or scorecard payload. Strategies: the payload
/// is itself an innings array; an array under `scorecard` or `innings`; or
/// either shape nested under `liveScore`.
pub fn extract_innings(data: &Value) -> Vec<RawInning> {
    let direct = data
        .as_array()
        .or_else(|| data.get("scorecard").and_then(Value::as_array))
        .or_else(|| data.get("innings").and_then(Value::as_array));
    if let Some(innings) = direct {
        return innings.iter().map(parse_inning).collect();
    }

    if let Some(live) = data.get("liveScore").or_else(|| data.get("live_score")) {
        let nested = live
            .as_array()
            .or_else(|| live.get("innings").and_then(Value::as_array));
        if let Some(innings) = nested {
            return innings.iter().map(parse_inning).collect();
        }
    }

    Vec::new()
}

/// The raw player list sometimes embedded in match-info, as bare names or
/// objects
pub fn extract_info_players(info: &Value) -> Vec<SquadMember> {
    info.get("players")
        .and_then(Value::as_array)
        .map(|players| players.iter().filter_map(parse_squad_member).collect())
        .unwrap_or_default()
}

/// Insertion-ordered player map keyed by case-insensitive name. Every
/// absorb fills only absent fields, so source precedence is the order the
/// sources are applied in.
#[derive(Debug, Default)]
struct PlayerMap {
    entries: Vec<PlayerEntry>,
    index: HashMap<String, usize>,
}

impl PlayerMap {
    fn entry_for(&mut self, name: &str) -> &mut PlayerEntry {
        let key = name.trim().to_lowercase();
        if let Some(&idx) = self.index.get(&key) {
            return &mut self.entries[idx];
        }
        let idx = self.entries.len();
        self.index.insert(key, idx);
        self.entries.push(PlayerEntry {
            name: name.trim().to_string(),
            ..PlayerEntry::default()
        });
        &mut self.entries[idx]
    }

    fn absorb_member(&mut self, member: &SquadMember) {
        let entry = self.entry_for(&member.name);
        fill(&mut entry.image, &member.image);
        fill(&mut entry.role, &member.role);
    }

    fn absorb_batter(&mut self, line: &BatterLine) {
        let entry = self.entry_for(&line.name);
        fill(&mut entry.runs, &line.runs);
        fill(&mut entry.balls, &line.balls);
        fill(&mut entry.fours, &line.fours);
        fill(&mut entry.sixes, &line.sixes);
        fill(&mut entry.strike_rate, &line.strike_rate);
        fill(&mut entry.dismissal, &line.dismissal);
    }

    fn absorb_bowler(&mut self, line: &BowlerLine) {
        let entry = self.entry_for(&line.name);
        fill(&mut entry.wickets, &line.wickets);
        fill(&mut entry.overs, &line.overs);
        fill(&mut entry.runs_conceded, &line.runs_conceded);
        fill(&mut entry.economy, &line.economy);
    }

    fn into_entries(self) -> Vec<PlayerEntry> {
        self.entries
    }
}

/// Fills `slot` only when it is still empty; populated fields are never
/// clobbered by later sources
fn fill<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if slot.is_none() && value.is_some() {
        *slot = value.clone();
    }
}

/// Merges all player sources into one deduplicated list. Squads are
/// applied first so their image/role fields win; live score innings,
/// scorecard innings, and the match-info player list then fill whatever
/// statistics are still missing, in that order.
pub fn merge_players(
    squads: &[TeamSquad],
    live_innings: &[RawInning],
    scorecard_innings: &[RawInning],
    info_players: &[SquadMember],
) -> Vec<PlayerEntry> {
    let mut map = PlayerMap::default();

    for squad in squads {
        for member in &squad.players {
            map.absorb_member(member);
        }
    }
    for inning in live_innings {
        for line in &inning.batting {
            map.absorb_batter(line);
        }
        for line in &inning.bowling {
            map.absorb_bowler(line);
        }
    }
    for inning in scorecard_innings {
        for line in &inning.batting {
            map.absorb_batter(line);
        }
        for line in &inning.bowling {
            map.absorb_bowler(line);
        }
    }
    for member in info_players {
        map.absorb_member(member);
    }

    map.into_entries()
}

/// Builds the current-batting-state summary.
///
/// Picks the first innings containing a not-yet-dismissed batter, else the
/// last innings. The dismissed list keeps the five most recent, newest
/// first. The next batter is the first squad member, by list order, whose
/// name has not appeared in the selected innings' batting list.
pub fn batting_summary(innings: &[RawInning], squad_order: &[String]) -> Option<BattingSummary> {
    if innings.is_empty() {
        return None;
    }

    let idx = innings
        .iter()
        .position(|inning| inning.batting.iter().any(|b| !b.is_dismissed()))
        .unwrap_or(innings.len() - 1);
    let inning = &innings[idx];

    let mut batting = Vec::new();
    let mut dismissed = Vec::new();
    for line in &inning.batting {
        if line.is_dismissed() {
            dismissed.push(line.clone());
        } else {
            batting.push(line.clone());
        }
    }
    dismissed.reverse();
    dismissed.truncate(DISMISSED_CAP);

    let seen: HashSet<String> = inning
        .batting
        .iter()
        .map(|line| line.name.trim().to_lowercase())
        .collect();
    let next_batter = squad_order
        .iter()
        .find(|name| !seen.contains(&name.trim().to_lowercase()))
        .cloned();

    Some(BattingSummary {
        inning: inning.name.clone(),
        batting,
        dismissed,
        next_batter,
        bowlers: inning.bowling.iter().take(BOWLER_CAP).cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batter(name: &str, runs: u32, dismissal: Option<&str>) -> BatterLine {
        BatterLine {
            name: name.to_string(),
            runs: Some(runs),
            dismissal: dismissal.map(str::to_string),
            ..BatterLine::default()
        }
    }

    fn bowler(name: &str, wickets: u32) -> BowlerLine {
        BowlerLine {
            name: name.to_string(),
            wickets: Some(wickets),
            ..BowlerLine::default()
        }
    }

    fn squad(team: &str, names: &[&str]) -> TeamSquad {
        TeamSquad {
            name: team.to_string(),
            players: names
                .iter()
                .map(|n| SquadMember {
                    name: n.to_string(),
                    role: Some("Batsman".to_string()),
                    image: Some(format!("https://img.test/{n}.png")),
                })
                .collect(),
        }
    }

    #[test]
    fn test_extract_squads_bare_array() {
        let data = json!([
            {"teamName": "India", "players": [
                {"name": "R Sharma", "role": "Batsman", "playerImg": "https://img.test/rs.png"},
                "V Kohli"
            ]},
            {"teamName": "Australia", "players": [{"name": "P Cummins", "role": "Bowler"}]}
        ]);
        let squads = extract_squads(&data);
        assert_eq!(squads.len(), 2);
        assert_eq!(squads[0].name, "India");
        assert_eq!(squads[0].players.len(), 2);
        assert_eq!(squads[0].players[0].role.as_deref(), Some("Batsman"));
        // Bare string member parses to a name-only entry.
        assert_eq!(squads[0].players[1].name, "V Kohli");
        assert!(squads[0].players[1].role.is_none());
    }

    #[test]
    fn test_extract_squads_wrapped() {
        let data = json!({"squad": [{"name": "India", "players": []}]});
        assert_eq!(extract_squads(&data).len(), 1);
        assert!(extract_squads(&json!({"nothing": true})).is_empty());
    }

    #[test]
    fn test_playing_xi_takes_first_eleven_in_order() {
        let names: Vec<String> = (1..=15).map(|i| format!("Player {i}")).collect();
        let members: Vec<SquadMember> = names
            .iter()
            .map(|n| SquadMember {
                name: n.clone(),
                role: None,
                image: None,
            })
            .collect();
        let xi = playing_xi_guess(&members);
        assert_eq!(xi.len(), 11);
        assert_eq!(xi[0], "Player 1");
        assert_eq!(xi[10], "Player 11");
    }

    #[test]
    fn test_playing_xi_short_squad() {
        let members = vec![SquadMember {
            name: "Solo".to_string(),
            role: None,
            image: None,
        }];
        assert_eq!(playing_xi_guess(&members), vec!["Solo"]);
    }

    #[test]
    fn test_extract_innings_shapes() {
        let scorecard = json!({"scorecard": [
            {"inning": "India Inning 1",
             "batting": [{"batsman": {"name": "R Sharma"}, "r": 45, "b": 30, "4s": 5, "6s": 2, "sr": 150.0, "dismissal": "c Carey b Starc"}],
             "bowling": [{"bowler": {"name": "M Starc"}, "o": 4, "r": 32, "w": 2, "eco": 8.0}]}
        ]});
        let innings = extract_innings(&scorecard);
        assert_eq!(innings.len(), 1);
        assert_eq!(innings[0].name, "India Inning 1");
        assert_eq!(innings[0].batting[0].name, "R Sharma");
        assert_eq!(innings[0].batting[0].runs, Some(45));
        assert!(innings[0].batting[0].is_dismissed());
        assert_eq!(innings[0].bowling[0].name, "M Starc");
        assert_eq!(innings[0].bowling[0].wickets, Some(2));

        let live = json!({"liveScore": {"innings": [{"name": "Inning 1", "batsmen": [], "bowlers": []}]}});
        assert_eq!(extract_innings(&live).len(), 1);

        let bare = json!([{"inning": "Only", "batting": [], "bowling": []}]);
        assert_eq!(extract_innings(&bare).len(), 1);

        assert!(extract_innings(&json!({"other": 1})).is_empty());
    }

    #[test]
    fn test_squad_availability_flags() {
        assert!(squad_available(&json!({"hasSquad": true})));
        assert!(!squad_available(&json!({"hasSquad": false})));
        assert!(!squad_available(&json!({})));
        assert!(squad_available(&json!({"squadAvailable": true})));
    }

    #[test]
    fn test_merge_squad_fields_take_precedence() {
        let squads = vec![squad("India", &["R Sharma"])];
        // Scorecard knows the same player under different casing, with a
        // dismissal the squad lacks.
        let scorecard = vec![RawInning {
            name: "Inning 1".to_string(),
            batting: vec![batter("r sharma", 45, Some("b Starc"))],
            bowling: Vec::new(),
        }];
        // Match-info player list would supply a different role.
        let info_players = vec![SquadMember {
            name: "R SHARMA".to_string(),
            role: Some("Opener".to_string()),
            image: None,
        }];

        let players = merge_players(&squads, &[], &scorecard, &info_players);
        assert_eq!(players.len(), 1);
        let p = &players[0];
        assert_eq!(p.name, "R Sharma");
        // Squad-sourced fields survive later sources.
        assert_eq!(p.role.as_deref(), Some("Batsman"));
        assert_eq!(p.image.as_deref(), Some("https://img.test/R Sharma.png"));
        // Stats arrive from the scorecard.
        assert_eq!(p.runs, Some(45));
        assert_eq!(p.dismissal.as_deref(), Some("b Starc"));
    }

    #[test]
    fn test_merge_stats_first_source_wins_later_fills_gaps() {
        let live = vec![RawInning {
            name: "Inning 1".to_string(),
            batting: vec![batter("V Kohli", 12, None)],
            bowling: Vec::new(),
        }];
        let scorecard = vec![RawInning {
            name: "Inning 1".to_string(),
            batting: vec![BatterLine {
                name: "V Kohli".to_string(),
                runs: Some(99),
                balls: Some(60),
                ..BatterLine::default()
            }],
            bowling: vec![bowler("V Kohli", 1)],
        }];

        let players = merge_players(&[], &live, &scorecard, &[]);
        assert_eq!(players.len(), 1);
        let p = &players[0];
        // Live score supplied runs first; the scorecard cannot clobber.
        assert_eq!(p.runs, Some(12));
        // The scorecard fills what the live score lacked.
        assert_eq!(p.balls, Some(60));
        assert_eq!(p.wickets, Some(1));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let squads = vec![squad("India", &["R Sharma", "V Kohli"])];
        let live = vec![RawInning {
            name: "Inning 1".to_string(),
            batting: vec![batter("R Sharma", 30, None), batter("V Kohli", 7, None)],
            bowling: vec![bowler("M Starc", 1)],
        }];
        let scorecard = live.clone();
        let info_players = vec![SquadMember {
            name: "M Starc".to_string(),
            role: Some("Bowler".to_string()),
            image: None,
        }];

        let first = merge_players(&squads, &live, &scorecard, &info_players);
        let second = merge_players(&squads, &live, &scorecard, &info_players);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_batting_summary_picks_inning_with_live_batter() {
        let innings = vec![
            RawInning {
                name: "Inning 1".to_string(),
                batting: vec![batter("A", 50, Some("b X")), batter("B", 20, Some("c Y b X"))],
                bowling: Vec::new(),
            },
            RawInning {
                name: "Inning 2".to_string(),
                batting: vec![batter("C", 5, None), batter("D", 0, Some("lbw b Z"))],
                bowling: vec![bowler("P", 1), bowler("Q", 0), bowler("R", 0)],
            },
        ];

        let summary = batting_summary(&innings, &[]).expect("summary");
        assert_eq!(summary.inning, "Inning 2");
        assert_eq!(summary.batting.len(), 1);
        assert_eq!(summary.batting[0].name, "C");
        assert_eq!(summary.dismissed.len(), 1);
        assert_eq!(summary.dismissed[0].name, "D");
        // First two bowlers only.
        assert_eq!(summary.bowlers.len(), 2);
        assert_eq!(summary.bowlers[0].name, "P");
    }

    #[test]
    fn test_batting_summary_falls_back_to_last_inning() {
        let innings = vec![
            RawInning {
                name: "Inning 1".to_string(),
                batting: vec![batter("A", 50, Some("b X"))],
                bowling: Vec::new(),
            },
            RawInning {
                name: "Inning 2".to_string(),
                batting: vec![batter("B", 10, Some("run out"))],
                bowling: Vec::new(),
            },
        ];

        let summary = batting_summary(&innings, &[]).expect("summary");
        assert_eq!(summary.inning, "Inning 2");
        assert!(summary.batting.is_empty());
    }

    #[test]
    fn test_dismissed_capped_at_five_most_recent_first() {
        let batting: Vec<BatterLine> = (1..=8)
            .map(|i| batter(&format!("Out {i}"), i, Some("bowled")))
            .chain(std::iter::once(batter("Striker", 4, None)))
            .collect();
        let innings = vec![RawInning {
            name: "Inning 1".to_string(),
            batting,
            bowling: Vec::new(),
        }];

        let summary = batting_summary(&innings, &[]).expect("summary");
        assert_eq!(summary.dismissed.len(), 5);
        // Most recent dismissal (latest in batting order) first.
        assert_eq!(summary.dismissed[0].name, "Out 8");
        assert_eq!(summary.dismissed[4].name, "Out 4");
    }

    #[test]
    fn test_next_batter_skips_names_already_seen() {
        let innings = vec![RawInning {
            name: "Inning 1".to_string(),
            batting: vec![batter("R Sharma", 30, None), batter("V Kohli", 7, Some("b Starc"))],
            bowling: Vec::new(),
        }];
        let squad_order = vec![
            "r sharma".to_string(),
            "V KOHLI".to_string(),
            "S Iyer".to_string(),
            "H Pandya".to_string(),
        ];

        let summary = batting_summary(&innings, &squad_order).expect("summary");
        assert_eq!(summary.next_batter.as_deref(), Some("S Iyer"));
    }

    #[test]
    fn test_next_batter_none_when_squad_exhausted() {
        let innings = vec![RawInning {
            name: "Inning 1".to_string(),
            batting: vec![batter("A", 1, None)],
            bowling: Vec::new(),
        }];
        let summary = batting_summary(&innings, &["A".to_string()]).expect("summary");
        assert!(summary.next_batter.is_none());
    }

    #[test]
    fn test_batting_summary_empty_innings() {
        assert!(batting_summary(&[], &[]).is_none());
    }

    #[test]
    fn test_extract_info_players() {
        let info = json!({"players": ["A Name", {"name": "B Name", "role": "Bowler"}]});
        let players = extract_info_players(&info);
        assert_eq!(players.len(), 2);
        assert_eq!(players[1].role.as_deref(), Some("Bowler"));
        assert!(extract_info_players(&json!({})).is_empty());
    }
}
