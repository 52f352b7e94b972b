//! Rearranging a ranked field so adjacent pairs avoid rematches.
//!
//! Two strategies are available:
//!
//! - [`relax`] is the default relaxation. It scans the sequence and, whenever
//!   a participant has already met the one just before it, swaps it with
//!   the participant two places further on (wrapping at the end). The scan
//!   is repeated once per participant. It looks at every adjacent position,
//!   including the boundary between two pairs, and can cycle: a chain of
//!   swaps may return to the order it started from. It is best effort and
//!   may leave rematches even when a clean pairing exists.
//! - [`backtrack`] searches for a pairing with no rematch, taking the best
//!   ranked free participant and trying opponents in rank order. The search
//!   is capped at [`SEARCH_BUDGET`] tried pairs. When no such pairing exists,
//!   or the cap is hit first, it leaves the sequence alone and [`arrange`]
//!   falls back to the relaxation.
//!
//! Neither strategy fails: whatever rematches remain are reported in the
//! [`PairingReport`] and the round goes ahead with them.

use crate::pairing::{adjacent_pairs, Competitor, Pairing};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use swiss_core::InputError;
use tracing::{debug, warn};

/// Which rematch-avoidance strategy a tournament uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingPolicy {
    /// Repeated swap relaxation.
    #[default]
    Relaxation,
    /// Exhaustive search, with the relaxation as fallback.
    Backtracking,
}

impl PairingPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            PairingPolicy::Relaxation => "relaxation",
            PairingPolicy::Backtracking => "backtracking",
        }
    }
}

impl FromStr for PairingPolicy {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxation" => Ok(PairingPolicy::Relaxation),
            "backtracking" => Ok(PairingPolicy::Backtracking),
            _ => Err(InputError::UnknownPairingPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for PairingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What rearranging a field did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingReport {
    /// Swaps performed by the relaxation, or positions moved by the search.
    pub swaps: usize,
    /// Pairings in the final order whose sides have met before.
    pub rematches: Vec<Pairing>,
}

impl PairingReport {
    /// True when the final pairing has no rematch.
    pub fn is_clean(&self) -> bool {
        self.rematches.is_empty()
    }
}

/// One relaxation scan over `sequence`. Returns the number of swaps.
///
/// For each position `i` from 1, if the participant at `i` has met the one
/// at `i - 1`, it trades places with the one at `(i + 2) % len`.
pub fn relaxation_pass<T: Competitor>(sequence: &mut [T]) -> usize {
    let len = sequence.len();
    let mut swaps = 0;
    for i in 1..len {
        if !sequence[i].has_faced(sequence[i - 1].id()) {
            continue;
        }
        let target = (i + 2) % len;
        if target == i {
            continue;
        }
        debug!(
            position = i,
            target,
            moved = sequence[i].id(),
            "swapping to avoid rematch with {}",
            sequence[i - 1].id()
        );
        sequence.swap(i, target);
        swaps += 1;
    }
    swaps
}

/// Runs [`relaxation_pass`] once per participant. Returns the total swaps.
pub fn relax<T: Competitor>(sequence: &mut [T]) -> usize {
    (0..sequence.len())
        .map(|_| relaxation_pass(sequence))
        .sum()
}

/// Upper bound on the candidate pairs [`backtrack`] tries before giving up.
pub const SEARCH_BUDGET: usize = 100_000;

/// Reorders `sequence` so that no adjacent pair is a rematch, if such an
/// order exists. Returns whether one was found; on failure `sequence` is
/// left untouched.
///
/// The search stops after [`SEARCH_BUDGET`] tried pairs and then reports
/// failure, even though a clean order might still exist.
pub fn backtrack<T: Competitor + Clone>(sequence: &mut [T]) -> bool {
    let mut used = vec![false; sequence.len()];
    let mut order = Vec::with_capacity(sequence.len());
    let mut budget = SEARCH_BUDGET;
    match search(sequence, &mut used, &mut order, &mut budget) {
        Search::Found => {}
        Search::Exhausted => return false,
        Search::OutOfBudget => {
            debug!(budget = SEARCH_BUDGET, "pairing search gave up");
            return false;
        }
    }
    let arranged: Vec<T> = order.iter().map(|&i| sequence[i].clone()).collect();
    sequence.clone_from_slice(&arranged);
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Search {
    Found,
    Exhausted,
    OutOfBudget,
}

fn search<T: Competitor>(
    sequence: &[T],
    used: &mut [bool],
    order: &mut Vec<usize>,
    budget: &mut usize,
) -> Search {
    let Some(top) = used.iter().position(|u| !u) else {
        return Search::Found;
    };
    used[top] = true;
    for candidate in top + 1..sequence.len() {
        if used[candidate] || Pairing::is_rematch(&sequence[top], &sequence[candidate]) {
            continue;
        }
        if *budget == 0 {
            return Search::OutOfBudget;
        }
        *budget -= 1;
        used[candidate] = true;
        order.extend([top, candidate]);
        match search(sequence, used, order, budget) {
            Search::Exhausted => {}
            done => return done,
        }
        order.truncate(order.len() - 2);
        used[candidate] = false;
    }
    used[top] = false;
    Search::Exhausted
}

/// Pairings read off `sequence` whose sides have met before.
pub fn rematches<T: Competitor>(sequence: &[T]) -> Vec<Pairing> {
    sequence
        .chunks_exact(2)
        .filter(|pair| Pairing::is_rematch(&pair[0], &pair[1]))
        .map(|pair| Pairing::new(pair[0].id(), pair[1].id()))
        .collect()
}

/// Rearranges a ranked `sequence` with the given policy and reports the
/// rematches left in the resulting adjacent pairs.
pub fn arrange<T: Competitor + Clone>(sequence: &mut [T], policy: PairingPolicy) -> PairingReport {
    let swaps = match policy {
        PairingPolicy::Relaxation => relax(sequence),
        PairingPolicy::Backtracking => {
            let before: Vec<String> = sequence.iter().map(|c| c.id().to_string()).collect();
            if backtrack(sequence) {
                before
                    .iter()
                    .zip(sequence.iter())
                    .filter(|(id, c)| id.as_str() != c.id())
                    .count()
            } else {
                debug!("no rematch-free pairing found, falling back to relaxation");
                relax(sequence)
            }
        }
    };

    let rematches = rematches(sequence);
    for pairing in &rematches {
        warn!(%pairing, "rematch could not be avoided");
    }
    PairingReport { swaps, rematches }
}

/// Convenience for callers that only need the pairings.
pub fn arranged_pairs<T: Competitor + Clone>(
    sequence: &mut [T],
    policy: PairingPolicy,
) -> (Vec<Pairing>, PairingReport) {
    let report = arrange(sequence, policy);
    (adjacent_pairs(sequence), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::tests::{met, names, seats, Seat};
    use proptest::prelude::*;

    #[test]
    fn test_no_history_means_no_swaps() {
        let mut field = seats(&["A", "B", "C", "D", "E", "F"]);
        assert_eq!(relax(&mut field), 0);
        assert_eq!(names(&field), vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_single_clash_swaps_two_places_ahead() {
        let mut field = seats(&["A", "B", "C", "D"]);
        met(&mut field, "A", "B");

        let swaps = relaxation_pass(&mut field);

        assert_eq!(swaps, 1);
        assert_eq!(names(&field), vec!["A", "D", "C", "B"]);
    }

    #[test]
    fn test_clash_at_end_wraps_around() {
        let mut field = seats(&["A", "B", "C", "D"]);
        met(&mut field, "C", "D");

        // Position 3 clashes with 2 and trades with (3 + 2) % 4 = 1.
        assert_eq!(relaxation_pass(&mut field), 1);
        assert_eq!(names(&field), vec!["A", "D", "C", "B"]);
    }

    #[test]
    fn test_cross_pair_adjacency_cycles_back() {
        // After A beat C and B drew D the ranked order is A, B, D, C. B and
        // D sit side by side across the pair boundary, so the scan swaps,
        // then swaps back on the next pass.
        let mut field = seats(&["A", "B", "D", "C"]);
        met(&mut field, "A", "C");
        met(&mut field, "B", "D");

        let swaps = relax(&mut field);

        assert_eq!(swaps, 8);
        assert_eq!(names(&field), vec!["A", "B", "D", "C"]);
        assert!(rematches(&field).is_empty());
    }

    #[test]
    fn test_unavoidable_rematch_is_reported_not_fatal() {
        let mut field = seats(&["A", "B"]);
        met(&mut field, "A", "B");

        for policy in [PairingPolicy::Relaxation, PairingPolicy::Backtracking] {
            let report = arrange(&mut field, policy);
            assert_eq!(report.rematches, vec![Pairing::new("A", "B")]);
            assert!(!report.is_clean());
            assert_eq!(names(&field), vec!["A", "B"]);
        }
    }

    #[test]
    fn test_backtracking_prefers_best_ranked_opponent() {
        let mut field = seats(&["A", "B", "C", "D"]);
        met(&mut field, "A", "B");
        met(&mut field, "C", "D");

        let (pairs, report) = arranged_pairs(&mut field, PairingPolicy::Backtracking);

        assert_eq!(pairs, vec![Pairing::new("A", "C"), Pairing::new("B", "D")]);
        assert!(report.is_clean());
        assert_eq!(report.swaps, 2);
    }

    #[test]
    fn test_backtracking_leaves_clean_order_alone() {
        let mut field = seats(&["A", "B", "D", "C"]);
        met(&mut field, "A", "C");
        met(&mut field, "B", "D");

        let report = arrange(&mut field, PairingPolicy::Backtracking);

        assert_eq!(report, PairingReport::default());
        assert_eq!(names(&field), vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn test_backtracking_gives_up_on_split_field() {
        // Two groups of 13, interleaved by rank, where everyone has met the
        // whole other group. Each group is odd, so no clean pairing exists
        // and an exhaustive search would not finish.
        let labels: Vec<String> = (0..26).map(|i| format!("P{i:02}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let mut field = seats(&refs);
        for a in (0..26).step_by(2) {
            for b in (1..26).step_by(2) {
                met(&mut field, &labels[a], &labels[b]);
            }
        }
        let mut relaxed = field.clone();
        relax(&mut relaxed);

        let started = std::time::Instant::now();
        let report = arrange(&mut field, PairingPolicy::Backtracking);

        assert!(
            started.elapsed() < std::time::Duration::from_secs(10),
            "search took {:?}",
            started.elapsed()
        );
        assert!(!report.is_clean());
        assert_eq!(names(&field), names(&relaxed));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Backtracking".parse::<PairingPolicy>().unwrap(), PairingPolicy::Backtracking);
        assert_eq!("relaxation".parse::<PairingPolicy>().unwrap(), PairingPolicy::Relaxation);
        assert!(matches!(
            "greedy".parse::<PairingPolicy>(),
            Err(InputError::UnknownPairingPolicy(_))
        ));
        assert_eq!(PairingPolicy::default(), PairingPolicy::Relaxation);
    }

    /// An even-sized field with a random symmetric history.
    fn field_strategy() -> impl Strategy<Value = Vec<Seat>> {
        (1usize..=5)
            .prop_flat_map(|half| {
                let n = half * 2;
                (Just(n), proptest::collection::vec((0..n, 0..n), 0..n * 2))
            })
            .prop_map(|(n, edges)| {
                let labels: Vec<String> = (0..n).map(|i| format!("P{i}")).collect();
                let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
                let mut field = seats(&refs);
                for (a, b) in edges {
                    if a != b && !field[a].has_faced(&labels[b]) {
                        met(&mut field, &labels[a], &labels[b]);
                    }
                }
                field
            })
    }

    fn has_adjacent_clash(field: &[Seat]) -> bool {
        field.windows(2).any(|w| w[1].has_faced(w[0].id()))
    }

    /// Independent check: can the field be split into pairs with no rematch?
    fn clean_matching_exists(field: &[Seat], free: u32) -> bool {
        if free == 0 {
            return true;
        }
        let first = free.trailing_zeros() as usize;
        let rest = free & !(1 << first);
        (0..field.len())
            .filter(|j| rest & (1 << j) != 0)
            .any(|j| {
                !field[first].has_faced(field[j].id())
                    && clean_matching_exists(field, rest & !(1 << j))
            })
    }

    proptest! {
        #[test]
        fn relaxation_is_a_permutation(field in field_strategy()) {
            let mut arranged = field.clone();
            relax(&mut arranged);

            let mut before = names(&field);
            let mut after = names(&arranged);
            before.sort_unstable();
            after.sort_unstable();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn relaxation_is_idempotent_once_resolved(field in field_strategy()) {
            let mut arranged = field;
            relax(&mut arranged);
            if !has_adjacent_clash(&arranged) {
                let settled = arranged.clone();
                prop_assert_eq!(relax(&mut arranged), 0);
                prop_assert_eq!(arranged, settled);
            }
        }

        #[test]
        fn sparse_history_yields_no_rematch(field in field_strategy()) {
            // Keep only meetings between participants not next to each other.
            let mut sparse = field;
            let labels: Vec<String> = sparse.iter().map(|s| s.name.clone()).collect();
            for (i, seat) in sparse.iter_mut().enumerate() {
                seat.faced.retain(|f| {
                    let j = labels.iter().position(|l| l == f).unwrap();
                    i.abs_diff(j) > 1
                });
            }

            let original = sparse.clone();
            let report = arrange(&mut sparse, PairingPolicy::Relaxation);

            prop_assert_eq!(report.swaps, 0);
            prop_assert!(report.is_clean());
            prop_assert_eq!(sparse, original);
        }

        #[test]
        fn backtracking_finds_clean_pairing_when_one_exists(field in field_strategy()) {
            let all = (1u32 << field.len()) - 1;
            let exists = clean_matching_exists(&field, all);

            let mut arranged = field;
            let report = arrange(&mut arranged, PairingPolicy::Backtracking);

            prop_assert_eq!(report.is_clean(), exists);
        }
    }
}
