//! Round and position arithmetic of a single-elimination bracket.

use crate::models::{MatchRules, SeriesType};

/// Number of rounds for `team_count` teams: `ceil(log2(team_count))`. 0 for fewer than 2 teams.
pub fn round_count(team_count: usize) -> u32 {
    if team_count < 2 {
        return 0;
    }
    usize::BITS - (team_count - 1).leading_zeros()
}

/// Matches in `round` (1-based): `ceil(team_count / 2^round)`.
pub fn matches_in_round(team_count: usize, round: u32) -> usize {
    if round >= usize::BITS {
        return usize::from(team_count > 0);
    }
    team_count.div_ceil(1usize << round)
}

/// Position in the next round fed by a match at `position`.
pub fn next_match_position(position: u32) -> u32 {
    position.div_ceil(2)
}

/// Odd positions feed slot A of the next match, even positions slot B.
pub fn feeds_slot_a(position: u32) -> bool {
    position % 2 == 1
}

/// Series format for a round: the final gets its own format.
pub fn series_type_for_round(rules: &MatchRules, round: u32, total_rounds: u32) -> SeriesType {
    if round == total_rounds {
        rules.final_series_type
    } else {
        rules.series_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_count_is_ceil_log2() {
        let expected = [(2, 1), (3, 2), (4, 2), (5, 3), (8, 3), (9, 4), (16, 4), (17, 5), (64, 6)];
        for (n, r) in expected {
            assert_eq!(round_count(n), r, "n = {n}");
        }
        assert_eq!(round_count(0), 0);
        assert_eq!(round_count(1), 0);
    }

    #[test]
    fn matches_per_round_halve_rounding_up() {
        assert_eq!(matches_in_round(5, 1), 3);
        assert_eq!(matches_in_round(5, 2), 2);
        assert_eq!(matches_in_round(5, 3), 1);
        assert_eq!(matches_in_round(8, 1), 4);
        assert_eq!(matches_in_round(8, 3), 1);
    }

    #[test]
    fn last_round_always_has_one_match() {
        for n in 2..=200 {
            let r = round_count(n);
            assert_eq!(matches_in_round(n, r), 1, "n = {n}");
            if r > 1 {
                assert!(matches_in_round(n, r - 1) >= 2, "n = {n}");
            }
        }
    }

    #[test]
    fn next_round_has_room_for_every_feeder() {
        for n in 2..=200 {
            for round in 1..round_count(n) {
                let here = matches_in_round(n, round) as u32;
                let next = matches_in_round(n, round + 1) as u32;
                assert_eq!(next_match_position(here), next, "n = {n}, round = {round}");
            }
        }
    }

    #[test]
    fn parity_selects_slot() {
        assert_eq!(next_match_position(1), 1);
        assert_eq!(next_match_position(2), 1);
        assert_eq!(next_match_position(3), 2);
        assert!(feeds_slot_a(1));
        assert!(!feeds_slot_a(2));
        assert!(feeds_slot_a(3));
    }

    #[test]
    fn final_uses_final_series_type() {
        let rules = MatchRules::default();
        assert_eq!(series_type_for_round(&rules, 1, 1), SeriesType::Bo3);
        assert_eq!(series_type_for_round(&rules, 1, 3), SeriesType::Bo1);
        assert_eq!(series_type_for_round(&rules, 3, 3), SeriesType::Bo3);
    }
}
