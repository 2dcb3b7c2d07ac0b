//! API key pool with rate-limit rotation
//!
//! The upstream provider enforces aggressive, unpredictable quotas per key.
//! The pool owns the fixed, ordered key set created at startup and tracks a
//! per-key block-until time. `acquire` keeps handing out the same key until
//! it gets marked rate-limited, then rotates forward to the next usable one.
//! A blocked key re-enters rotation after a fixed cooldown.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::error::FeedError;

/// One upstream credential and its rate-limit state
#[derive(Debug, Clone)]
pub struct Credential {
    /// The API key value
    pub token: String,
    /// Set while the key is cooling down after a rate-limit detection
    pub blocked_until: Option<Instant>,
}

impl Credential {
    fn new(token: String) -> Self {
        Self {
            token,
            blocked_until: None,
        }
    }

    /// True while the key is inside its cooldown window
    pub fn is_blocked(&self) -> bool {
        self.blocked_until.is_some_and(|until| until > Instant::now())
    }
}

/// Block state of one key, for the diagnostic status surface. The token is
/// reduced to its tail so status output never leaks a full key.
#[derive(Debug, Clone, Serialize)]
pub struct KeyStatus {
    /// Position of the key in the configured order
    pub index: usize,
    /// Last four characters of the token
    pub token_hint: String,
    /// Seconds of cooldown remaining, absent when the key is usable
    pub blocked_for_secs: Option<u64>,
}

/// Rotating pool of upstream API keys
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<Credential>,
    cursor: usize,
    cooldown: Duration,
}

impl KeyPool {
    /// Creates a pool from the configured key set.
    ///
    /// # Errors
    /// Returns `FeedError::NoCredentials` when `tokens` is empty — a
    /// configuration error surfaced immediately rather than at first call.
    pub fn new(tokens: Vec<String>, cooldown: Duration) -> Result<Self, FeedError> {
        if tokens.is_empty() {
            return Err(FeedError::NoCredentials);
        }
        Ok(Self {
            keys: tokens.into_iter().map(Credential::new).collect(),
            cursor: 0,
            cooldown,
        })
    }

    /// Selects the next usable key.
    ///
    /// Scans forward from the cursor (wrapping) for the first key whose
    /// cooldown is absent or elapsed, parks the cursor there, and returns
    /// its token. When every key is blocked the key at the cursor is
    /// returned anyway so the caller can still attempt the call.
    pub fn acquire(&mut self) -> String {
        let len = self.keys.len();
        for offset in 0..len {
            let idx = (self.cursor + offset) % len;
            if !self.keys[idx].is_blocked() {
                self.cursor = idx;
                return self.keys[idx].token.clone();
            }
        }
        self.keys[self.cursor].token.clone()
    }

    /// Marks a key as rate-limited for the configured cooldown and advances
    /// the cursor past it. Unknown tokens are ignored.
    pub fn mark_rate_limited(&mut self, token: &str) {
        let len = self.keys.len();
        if let Some(idx) = self.keys.iter().position(|k| k.token == token) {
            self.keys[idx].blocked_until = Some(Instant::now() + self.cooldown);
            self.cursor = (idx + 1) % len;
        }
    }

    /// True when every key in the pool is currently cooling down
    pub fn all_blocked(&self) -> bool {
        self.keys.iter().all(Credential::is_blocked)
    }

    /// Number of configured keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false after construction; the pool rejects an empty key set
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Per-key block state for the diagnostic status query
    pub fn statuses(&self) -> Vec<KeyStatus> {
        let now = Instant::now();
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                let blocked_for_secs = key
                    .blocked_until
                    .filter(|until| *until > now)
                    .map(|until| (until - now).as_secs());
                KeyStatus {
                    index,
                    token_hint: token_hint(&key.token),
                    blocked_for_secs,
                }
            })
            .collect()
    }
}

/// Last four characters of a token, for log and status output
fn token_hint(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
