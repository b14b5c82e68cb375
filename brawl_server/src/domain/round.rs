// Round clock and match progression. Pure bookkeeping: the arena applies the consequences.

use crate::domain::entities::PlayerId;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinRule {
    /// The match ends after `max_rounds` rounds.
    Rounds,
    /// The first player to this many points wins. Rounds keep rotating.
    ScoreLimit(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundRules {
    pub round_time: f32,
    pub max_rounds: u32,
    pub countdown: f32,
    /// Remaining round time under which a score tie starts the pombo timer.
    pub pombo_window: f32,
    /// How long a tie must persist before the pombo ends the round.
    pub pombo_duration: f32,
    pub win_rule: WinRule,
    pub min_players: usize,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            round_time: 120.0,
            max_rounds: 10,
            countdown: 3.0,
            pombo_window: 10.0,
            pombo_duration: 5.0,
            win_rule: WinRule::Rounds,
            min_players: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Waiting,
    Countdown { remaining: f32 },
    Active,
    GameOver,
}

/// What happened on one controller tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundTick {
    /// The countdown finished and the round clock started.
    pub started: bool,
    pub spawn_queijada: bool,
    pub pombo: bool,
    pub time_up: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    NextRound { level_index: usize },
    GameOver,
}

#[derive(Debug, Clone)]
pub struct RoundController {
    pub rules: RoundRules,
    pub phase: Phase,
    /// Rounds completed so far.
    pub round: u32,
    pub level_index: usize,
    pub timer: f32,
    pub queijada_spawned: bool,
    pub pombo_timer: f32,
}

impl RoundController {
    pub fn new(rules: RoundRules) -> Self {
        Self {
            rules,
            phase: Phase::Waiting,
            round: 0,
            level_index: 0,
            timer: rules.round_time,
            queijada_spawned: false,
            pombo_timer: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Advances the phase machine by `dt`. `ready` is the number of players that have
    /// chosen a class.
    pub fn advance(&mut self, dt: f32, ready: usize, scores: &[(PlayerId, u32)]) -> RoundTick {
        let mut tick = RoundTick::default();
        let enough = ready >= self.rules.min_players;
        match self.phase {
            Phase::Waiting => {
                if enough {
                    self.phase = Phase::Countdown {
                        remaining: self.rules.countdown,
                    };
                }
            }
            Phase::Countdown { remaining } => {
                if !enough {
                    self.phase = Phase::Waiting;
                } else if remaining - dt <= 0.0 {
                    self.start_round();
                    tick.started = true;
                } else {
                    self.phase = Phase::Countdown {
                        remaining: remaining - dt,
                    };
                }
            }
            Phase::Active => {
                self.timer -= dt;
                if !self.queijada_spawned && self.timer <= self.rules.round_time / 2.0 {
                    self.queijada_spawned = true;
                    tick.spawn_queijada = true;
                }
                if self.timer < self.rules.pombo_window && tied_at_top(scores) {
                    self.pombo_timer += dt;
                    if self.pombo_timer >= self.rules.pombo_duration {
                        tick.pombo = true;
                    }
                } else {
                    self.pombo_timer = 0.0;
                }
                if !tick.pombo && self.timer <= 0.0 {
                    self.timer = 0.0;
                    tick.time_up = true;
                }
            }
            Phase::GameOver => {}
        }
        tick
    }

    /// Closes the current round and decides what follows. Starting the next round clock is
    /// immediate: players keep fighting on the next level.
    pub fn finish_round(&mut self, level_count: usize) -> RoundEnd {
        self.round += 1;
        if self.rules.win_rule == WinRule::Rounds && self.round >= self.rules.max_rounds {
            self.phase = Phase::GameOver;
            return RoundEnd::GameOver;
        }
        self.level_index = (self.level_index + 1) % level_count.max(1);
        self.start_round();
        RoundEnd::NextRound {
            level_index: self.level_index,
        }
    }

    /// True when the score-limit rule is active and `score` reaches it.
    pub fn reaches_score_limit(&self, score: u32) -> bool {
        matches!(self.rules.win_rule, WinRule::ScoreLimit(limit) if score >= limit)
    }

    pub fn end_match(&mut self) {
        self.phase = Phase::GameOver;
    }

    /// Back to a fresh match on the first level.
    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }

    fn start_round(&mut self) {
        self.phase = Phase::Active;
        self.timer = self.rules.round_time;
        self.queijada_spawned = false;
        self.pombo_timer = 0.0;
    }
}

/// Two or more players share a positive top score.
pub fn tied_at_top(scores: &[(PlayerId, u32)]) -> bool {
    let Some(top) = scores.iter().map(|(_, score)| *score).max() else {
        return false;
    };
    top > 0 && scores.iter().filter(|(_, score)| *score == top).count() > 1
}

/// Highest scorer, with ties broken uniformly at random.
pub fn pick_winner(scores: &[(PlayerId, u32)], rng: &mut impl Rng) -> Option<PlayerId> {
    let top = scores.iter().map(|(_, score)| *score).max()?;
    let leaders: Vec<PlayerId> = scores
        .iter()
        .filter(|(_, score)| *score == top)
        .map(|(id, _)| *id)
        .collect();
    leaders.get(rng.gen_range(0..leaders.len())).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rules() -> RoundRules {
        RoundRules {
            round_time: 20.0,
            max_rounds: 3,
            countdown: 1.0,
            ..RoundRules::default()
        }
    }

    fn active(rules: RoundRules) -> RoundController {
        let mut round = RoundController::new(rules);
        round.advance(0.1, 2, &[]);
        let tick = round.advance(rules.countdown, 2, &[]);
        assert!(tick.started);
        round
    }

    #[test]
    fn when_two_players_are_ready_then_countdown_leads_to_active() {
        let mut round = RoundController::new(rules());

        round.advance(0.1, 1, &[]);
        assert_eq!(round.phase, Phase::Waiting);

        round.advance(0.1, 2, &[]);
        assert_eq!(round.phase, Phase::Countdown { remaining: 1.0 });

        round.advance(0.5, 2, &[]);
        assert!(!round.is_active());
        let tick = round.advance(0.5, 2, &[]);
        assert!(tick.started);
        assert!(round.is_active());
        assert_eq!(round.timer, 20.0);
    }

    #[test]
    fn when_a_player_drops_during_countdown_then_back_to_waiting() {
        let mut round = RoundController::new(rules());
        round.advance(0.1, 2, &[]);

        round.advance(0.1, 1, &[]);

        assert_eq!(round.phase, Phase::Waiting);
    }

    #[test]
    fn when_half_the_round_elapses_then_queijada_spawns_once() {
        let mut round = active(rules());

        assert!(!round.advance(9.0, 2, &[]).spawn_queijada);
        assert!(round.advance(1.0, 2, &[]).spawn_queijada);
        assert!(!round.advance(1.0, 2, &[]).spawn_queijada);
    }

    #[test]
    fn when_clock_runs_out_then_time_up_is_reported() {
        let mut round = active(rules());

        let tick = round.advance(20.0, 2, &[]);

        assert!(tick.time_up);
        assert_eq!(round.timer, 0.0);
    }

    #[test]
    fn when_top_score_tie_persists_late_then_pombo_fires() {
        let mut round = active(rules());
        let tied = [(1, 2), (2, 2)];
        round.advance(11.0, 2, &[]);

        assert!(!round.advance(3.0, 2, &tied).pombo);
        assert!(!round.advance(1.0, 2, &[(1, 3), (2, 2)]).pombo);
        assert_eq!(round.pombo_timer, 0.0);
        assert!(!round.advance(3.0, 2, &tied).pombo);
        assert!(round.advance(2.0, 2, &tied).pombo);
    }

    #[test]
    fn when_tie_is_at_zero_then_pombo_never_starts() {
        assert!(!tied_at_top(&[(1, 0), (2, 0)]));
        assert!(!tied_at_top(&[(1, 1)]));
        assert!(tied_at_top(&[(1, 1), (2, 1), (3, 0)]));
    }

    #[test]
    fn when_last_round_finishes_then_match_is_over() {
        let mut round = active(rules());

        assert_eq!(round.finish_round(5), RoundEnd::NextRound { level_index: 1 });
        assert!(round.is_active());
        assert_eq!(round.finish_round(5), RoundEnd::NextRound { level_index: 2 });
        assert_eq!(round.finish_round(5), RoundEnd::GameOver);
        assert!(round.is_over());
        assert_eq!(round.round, 3);
    }

    #[test]
    fn when_score_limit_rule_is_active_then_rounds_never_end_the_match() {
        let mut round = active(RoundRules {
            win_rule: WinRule::ScoreLimit(5),
            ..rules()
        });

        for _ in 0..10 {
            assert!(matches!(round.finish_round(5), RoundEnd::NextRound { .. }));
        }
        assert_eq!(round.level_index, 0);
        assert!(round.reaches_score_limit(5));
        assert!(!round.reaches_score_limit(4));
    }

    #[test]
    fn when_leaders_tie_then_winner_is_one_of_them() {
        let mut rng = StdRng::seed_from_u64(7);
        let scores = [(1, 3), (2, 3), (3, 1)];

        for _ in 0..20 {
            let winner = pick_winner(&scores, &mut rng).expect("a winner");
            assert!(winner == 1 || winner == 2);
        }
        assert_eq!(pick_winner(&[(4, 0)], &mut rng), Some(4));
        assert_eq!(pick_winner(&[], &mut rng), None);
    }
}
