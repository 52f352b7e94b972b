//! Re-ranking the field between rounds.

use std::cmp::Ordering;
use swiss_core::Participant;

/// Standings order: score descending, then prior rank ascending.
pub fn standings_order(a: &Participant, b: &Participant) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.rank.cmp(&b.rank))
}

/// Sorts `participants` into standings order and reassigns ranks 1..=N to
/// match their new positions.
///
/// The sort is stable, so ties on both keys keep their relative order.
pub fn rank(participants: &mut [Participant]) {
    participants.sort_by(standings_order);
    for (position, participant) in participants.iter_mut().enumerate() {
        participant.rank = position as u32 + 1;
    }
}
