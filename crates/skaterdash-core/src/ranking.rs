// Top-N selection: the default player subset for each tab.
//
// Players are ranked by a statistic summed over all of their rows, which
// folds together traded players' per-team rows and the per-situation rows.

use std::collections::HashMap;

use crate::catalog::UnknownStatisticError;
use crate::dataset::{PlayerIdentity, PlayerStatRow};

/// A player's summed ranking value.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPlayer {
    pub identity: PlayerIdentity,
    pub total: f64,
}

/// Sum `stat` per player and return every player, best first.
///
/// Ties keep first-seen order: `sort_by` is stable and the input to the sort
/// is in the order players first appear in `rows`.
pub fn rank_players(
    rows: &[&PlayerStatRow],
    stat: &str,
) -> Result<Vec<RankedPlayer>, UnknownStatisticError> {
    let mut ranked: Vec<RankedPlayer> = Vec::new();
    let mut slot: HashMap<&PlayerIdentity, usize> = HashMap::new();

    for row in rows {
        let value = row.stat(stat).ok_or_else(|| UnknownStatisticError::new(stat))?;
        match slot.get(&row.identity) {
            Some(&i) => ranked[i].total += value,
            None => {
                slot.insert(&row.identity, ranked.len());
                ranked.push(RankedPlayer {
                    identity: row.identity.clone(),
                    total: value,
                });
            }
        }
    }

    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    Ok(ranked)
}

/// The `n` players with the highest summed `stat`.
///
/// Returns every player when fewer than `n` exist. Ties go to the player that
/// appears first in `rows`.
pub fn top_n(
    rows: &[&PlayerStatRow],
    n: usize,
    stat: &str,
) -> Result<Vec<PlayerIdentity>, UnknownStatisticError> {
    let ranked = rank_players(rows, stat)?;
    Ok(ranked.into_iter().take(n).map(|r| r.identity).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, Position};

    fn dataset(csv: &str) -> Dataset {
        Dataset::from_reader(csv.as_bytes()).unwrap()
    }

    fn names(players: &[PlayerIdentity]) -> Vec<&str> {
        players.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn tie_goes_to_first_seen_player() {
        let ds = dataset(
            "\
playerId,name,team,position,situation,I_F_points
1,Alpha,BOS,C,all,75
2,Bravo,TOR,C,all,80
3,Charlie,MTL,C,all,75",
        );
        let rows = ds.filter_by_position(Position::Center);
        let top = top_n(&rows, 2, "I_F_points").unwrap();
        assert_eq!(names(&top), vec!["Bravo", "Alpha"]);
    }

    #[test]
    fn sums_across_situations_and_teams() {
        let ds = dataset(
            "\
playerId,name,team,position,situation,I_F_points
1,Alpha,BOS,C,all,40
1,Alpha,BOS,C,5on4,15
2,Bravo,TOR,C,all,50
3,Traded,ANA,C,all,30
3,Traded,TOR,C,all,30",
        );
        let rows = ds.filter_by_position(Position::AllSkaters);
        let ranked = rank_players(&rows, "I_F_points").unwrap();
        assert_eq!(ranked[0].identity.name, "Traded");
        assert!((ranked[0].total - 60.0).abs() < f64::EPSILON);
        assert_eq!(ranked[1].identity.name, "Alpha");
        assert!((ranked[1].total - 55.0).abs() < f64::EPSILON);
        assert_eq!(ranked[2].identity.name, "Bravo");
    }

    #[test]
    fn fewer_players_than_n_returns_all() {
        let ds = dataset(
            "\
playerId,name,team,position,situation,I_F_points
1,Alpha,BOS,D,all,10
2,Bravo,TOR,D,all,20",
        );
        let rows = ds.filter_by_position(Position::Defenseman);
        let top = top_n(&rows, 50, "I_F_points").unwrap();
        assert_eq!(names(&top), vec!["Bravo", "Alpha"]);
    }

    #[test]
    fn result_is_distinct_and_bounded() {
        let ds = dataset(
            "\
playerId,name,team,position,situation,I_F_points
1,Alpha,BOS,C,all,10
1,Alpha,BOS,C,other,10
2,Bravo,TOR,C,all,5
3,Charlie,MTL,C,all,1",
        );
        let rows = ds.filter_by_position(Position::Center);
        let top = top_n(&rows, 2, "I_F_points").unwrap();
        assert_eq!(top.len(), 2);
        assert_ne!(top[0], top[1]);
    }

    #[test]
    fn zero_n_is_empty() {
        let ds = dataset(
            "\
playerId,name,team,position,situation,I_F_points
1,Alpha,BOS,C,all,10",
        );
        let rows = ds.filter_by_position(Position::Center);
        assert!(top_n(&rows, 0, "I_F_points").unwrap().is_empty());
    }

    #[test]
    fn unknown_ranking_stat_is_an_error() {
        let ds = dataset(
            "\
playerId,name,team,position,situation,I_F_points
1,Alpha,BOS,C,all,10",
        );
        let rows = ds.filter_by_position(Position::Center);
        let err = top_n(&rows, 5, "I_F_nothing").unwrap_err();
        assert_eq!(err.key, "I_F_nothing");
    }

    #[test]
    fn empty_rows_rank_nothing() {
        assert!(top_n(&[], 5, "I_F_points").unwrap().is_empty());
    }
}
