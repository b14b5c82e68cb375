use crate::domain::round::{RoundRules, WinRule};
use std::{env, time::Duration};

// Runtime/server settings read from the environment (not gameplay tuning).

pub fn host() -> String {
    env::var("GAME_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
}

pub fn http_port() -> u16 {
    parse_var("GAME_SERVER_PORT").unwrap_or(5000)
}

/// Round rules with env overrides applied on top of the defaults.
pub fn round_rules() -> RoundRules {
    let mut rules = RoundRules::default();
    if let Some(secs) = parse_var::<f32>("ROUND_TIME_SECS").filter(|s| *s > 0.0) {
        rules.round_time = secs;
    }
    if let Some(rounds) = parse_var::<u32>("MAX_ROUNDS").filter(|r| *r > 0) {
        rules.max_rounds = rounds;
    }
    // Zero keeps the rounds rule.
    if let Some(limit) = parse_var::<u32>("SCORE_LIMIT").filter(|l| *l > 0) {
        rules.win_rule = WinRule::ScoreLimit(limit);
    }
    rules
}

pub fn match_seed() -> Option<u64> {
    parse_var("MATCH_SEED")
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const WORLD_BROADCAST_CAPACITY: usize = 128;

pub const TICK_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);
// Steps run back to back when the loop falls behind before the backlog is dropped.
pub const MAX_CATCH_UP_STEPS: u32 = 5;
pub const MAX_PLAYERS: usize = 2;
