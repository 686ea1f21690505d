use super::Lobby;
use crate::types::*;

impl Lobby {
    /// Totals per participant, summed from the recorded question results.
    ///
    /// Participants who left after scoring keep their historical points.
    /// Everyone sharing the highest total is flagged as a winner; ties are
    /// not broken. Sorted by score descending, then first appearance.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .participants
            .iter()
            .map(|p| Standing {
                id: p.id.clone(),
                name: p.name.clone(),
                score: 0,
                is_winner: false,
            })
            .collect();

        for results in self.questions.iter().filter_map(|q| q.results.as_ref()) {
            for (id, result) in results {
                match standings.iter_mut().find(|s| s.id == *id) {
                    Some(standing) => standing.score += result.points,
                    None => standings.push(Standing {
                        id: id.clone(),
                        name: result.name.clone(),
                        score: result.points,
                        is_winner: false,
                    }),
                }
            }
        }

        if let Some(top) = standings.iter().map(|s| s.score).max() {
            for standing in &mut standings {
                standing.is_winner = standing.score == top;
            }
        }

        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings
    }
}
