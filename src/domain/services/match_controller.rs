//! C4 — the multi-deal match controller: level-up, banker switch, and
//! termination. Owns `MatchState`; the `DealEngine` (C3) is constructed
//! fresh per deal and surfaces its result back here rather than holding a
//! back-reference (§9 "cyclic references").

use crate::domain::entities::{team_of, DealState, MatchState, Phase, Seat, Team};
use crate::domain::repositories::RandomSource;
use crate::domain::services::deal_engine::start_deal;

/// Outcome of folding a finished deal into the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Continues,
    MatchOver { winning_team: Team, final_levels: [u8; 2] },
}

/// Apply a finished deal's winners array to the match state, computing the
/// level-up step (§4.4) and checking for match termination.
pub fn apply_deal_outcome(match_state: &mut MatchState, winners: &[Seat; 4]) -> MatchOutcome {
    let [p1, p2, p3, _p4] = *winners;
    let winning_team = Team::from_seat(p1);
    let step = if team_of(p1) == team_of(p2) {
        3
    } else if team_of(p1) == team_of(p3) {
        2
    } else {
        1
    };

    match_state.last_winners = winners.to_vec();
    match_state.apply_deal_result(winning_team, step);

    if match_state.finished {
        MatchOutcome::MatchOver { winning_team, final_levels: match_state.team_levels }
    } else {
        MatchOutcome::Continues
    }
}

/// Host `forceEnd` (§4.4 "Host override"): resets match-level state. The
/// caller is responsible for discarding the live `DealEngine` / detaching
/// any pending timers keyed to it.
pub fn force_end(match_state: &mut MatchState) {
    *match_state = MatchState::new();
}

/// Construct the next deal once the grace period has elapsed (§4.4 "Deal
/// chaining"), seeded with the controller's current team-levels, active
/// team, and the previous deal's finishing order.
pub fn start_next_deal(match_state: &MatchState, rng: &mut dyn RandomSource) -> DealState {
    let level = match_state.level_of(match_state.active_team);
    let starting_seat = match_state.active_team.index() as Seat;
    let previous: Option<[Seat; 4]> = if match_state.last_winners.len() == 4 {
        Some([
            match_state.last_winners[0],
            match_state.last_winners[1],
            match_state.last_winners[2],
            match_state.last_winners[3],
        ])
    } else {
        None
    };
    start_deal(level, starting_seat, previous, rng)
}

/// True once a deal (however it got there) has reached `Phase::Score`.
pub fn deal_is_scored(deal: &DealState) -> bool {
    deal.phase == Phase::Score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_win_steps_three_and_keeps_active_team() {
        let mut m = MatchState::new();
        let outcome = apply_deal_outcome(&mut m, &[0, 2, 1, 3]);
        assert_eq!(outcome, MatchOutcome::Continues);
        assert_eq!(m.team_levels[0], 5);
        assert_eq!(m.active_team, Team::Zero);
    }

    #[test]
    fn single_win_steps_two() {
        let mut m = MatchState::new();
        apply_deal_outcome(&mut m, &[0, 1, 2, 3]);
        assert_eq!(m.team_levels[0], 4);
    }

    #[test]
    fn banker_switches_when_other_team_wins() {
        let mut m = MatchState::new();
        apply_deal_outcome(&mut m, &[1, 3, 0, 2]);
        assert_eq!(m.active_team, Team::One);
        assert_eq!(m.team_levels[1], 5);
    }

    #[test]
    fn match_over_on_second_consecutive_win_at_level_fourteen() {
        let mut m = MatchState::new();
        m.team_levels = [14, 10];
        m.active_team = Team::Zero;
        let first = apply_deal_outcome(&mut m, &[0, 1, 2, 3]);
        assert_eq!(first, MatchOutcome::Continues);
        let second = apply_deal_outcome(&mut m, &[0, 1, 2, 3]);
        assert!(matches!(second, MatchOutcome::MatchOver { winning_team: Team::Zero, .. }));
    }

    #[test]
    fn force_end_resets_to_fresh_match_state() {
        let mut m = MatchState::new();
        apply_deal_outcome(&mut m, &[0, 2, 1, 3]);
        force_end(&mut m);
        assert_eq!(m.team_levels, [2, 2]);
        assert_eq!(m.deal_number, 0);
    }
}
