//! Applying match outcomes to participants.

use crate::{EngineError, Match};
use swiss_core::{Participant, Points};

/// Awards the points of `m` to its two participants and records each in
/// the other's opponent history.
///
/// `first` and `second` must be exactly the participants `m` refers to, in
/// the same order. Calling this twice for one match counts it twice.
///
/// # Errors
///
/// Returns [`EngineError::ParticipantMismatch`] without touching either
/// participant when the identities do not line up.
pub fn apply_match(
    m: &Match,
    first: &mut Participant,
    second: &mut Participant,
) -> Result<Points, EngineError> {
    if first.id() != m.first || second.id() != m.second {
        return Err(EngineError::ParticipantMismatch {
            expected_first: m.first.clone(),
            expected_second: m.second.clone(),
            given_first: first.id().to_string(),
            given_second: second.id().to_string(),
        });
    }

    let points = m.outcome.points();
    first.record_match(&m.second, points.first);
    second.record_match(&m.first, points.second);
    Ok(points)
}

/// Scores a whole round against the registry.
///
/// Every match is resolved before any score changes, so the round is
/// either fully applied or not applied at all.
///
/// # Errors
///
/// Returns [`EngineError::UnknownParticipant`] for an identity missing from
/// `participants`, and [`EngineError::DoubleBooked`] when someone appears in
/// two matches of the round.
pub fn score_round(participants: &mut [Participant], matches: &[Match]) -> Result<(), EngineError> {
    let mut seats = Vec::with_capacity(matches.len());
    let mut booked = vec![false; participants.len()];

    for m in matches {
        let first = position(participants, &m.first)?;
        let second = position(participants, &m.second)?;
        for (idx, id) in [(first, &m.first), (second, &m.second)] {
            if booked[idx] {
                return Err(EngineError::DoubleBooked(id.clone()));
            }
            booked[idx] = true;
        }
        seats.push((first, second));
    }

    for (m, (first, second)) in matches.iter().zip(seats) {
        let (a, b) = pair_mut(participants, first, second);
        apply_match(m, a, b)?;
    }
    Ok(())
}

fn position(participants: &[Participant], id: &str) -> Result<usize, EngineError> {
    participants
        .iter()
        .position(|p| p.id() == id)
        .ok_or_else(|| EngineError::UnknownParticipant(id.to_string()))
}

/// Two distinct mutable borrows, returned in argument order.
fn pair_mut(
    participants: &mut [Participant],
    a: usize,
    b: usize,
) -> (&mut Participant, &mut Participant) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = participants.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = participants.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
