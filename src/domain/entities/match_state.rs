//! Match-level state spanning many deals (§3 Match state, §4.4 Match Controller).

use serde::{Deserialize, Serialize};

use super::seat::{Seat, Team};

/// Step added to a team's level when it wins a deal, keyed by the number
/// of opposing players still holding cards when the last player of the
/// winning team finishes (double-down, single-down, ...). See §4.4.1.
pub fn level_step(opponents_remaining_with_cards: u8) -> u8 {
    match opponents_remaining_with_cards {
        0 => 3, // double-down: both opponents still in hand
        1 => 2, // single-down
        _ => 1, // plain win
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Current level per team, 2..=14 (Ace). Index by `Team::index()`.
    pub team_levels: [u8; 2],
    /// Team currently attacking the level ladder.
    pub active_team: Team,
    /// Consecutive deal wins recorded by the active team while its level is 14.
    pub wins_at_fourteen: u8,
    /// Seats that finished the previous deal, in finishing order.
    pub last_winners: Vec<Seat>,
    pub deal_number: u32,
    pub finished: bool,
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            team_levels: [2, 2],
            active_team: Team::Zero,
            wins_at_fourteen: 0,
            last_winners: Vec::new(),
            deal_number: 0,
            finished: false,
        }
    }

    pub fn level_of(&self, team: Team) -> u8 {
        self.team_levels[team.index()]
    }

    /// Apply a deal's outcome: winning team, step. Per §4.4.2 the match ends
    /// when the active team wins twice in a row while already at level 14.
    pub fn apply_deal_result(&mut self, winning_team: Team, step: u8) {
        self.deal_number += 1;
        if winning_team == self.active_team && self.level_of(self.active_team) == 14 {
            self.wins_at_fourteen += 1;
        } else {
            // Not already at 14 before this deal (even if this win's step
            // levels the team up to 14): counters stay at zero until a win
            // is recorded while the level was 14 going in.
            self.wins_at_fourteen = 0;
        }

        if self.level_of(self.active_team) == 14 && self.wins_at_fourteen >= 2 {
            self.finished = true;
            return;
        }

        let idx = winning_team.index();
        self.team_levels[idx] = (self.team_levels[idx] + step).min(14);
        self.active_team = winning_team;
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_step_matches_finish_order() {
        assert_eq!(level_step(0), 3);
        assert_eq!(level_step(1), 2);
        assert_eq!(level_step(2), 1);
    }

    #[test]
    fn match_ends_on_second_consecutive_win_at_fourteen() {
        let mut m = MatchState::new();
        m.team_levels = [14, 10];
        m.active_team = Team::Zero;
        m.apply_deal_result(Team::Zero, 1);
        assert!(!m.finished);
        m.apply_deal_result(Team::Zero, 1);
        assert!(m.finished);
    }

    #[test]
    fn win_by_other_team_resets_streak() {
        let mut m = MatchState::new();
        m.team_levels = [14, 10];
        m.active_team = Team::Zero;
        m.apply_deal_result(Team::Zero, 1);
        assert_eq!(m.wins_at_fourteen, 1);
        m.apply_deal_result(Team::One, 1);
        assert_eq!(m.active_team, Team::One);
        assert_eq!(m.wins_at_fourteen, 0);
    }
}
