//! Pairings and the first-round half split.

use serde::{Deserialize, Serialize};
use swiss_core::Participant;

/// Anything that can be paired: it has an identity and an opponent history.
pub trait Competitor {
    /// Identity recorded in other competitors' histories.
    fn id(&self) -> &str;

    /// Whether this competitor has already met `opponent`.
    fn has_faced(&self, opponent: &str) -> bool;
}

impl Competitor for Participant {
    fn id(&self) -> &str {
        Participant::id(self)
    }

    fn has_faced(&self, opponent: &str) -> bool {
        Participant::has_faced(self, opponent)
    }
}

impl<T: Competitor + ?Sized> Competitor for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn has_faced(&self, opponent: &str) -> bool {
        (**self).has_faced(opponent)
    }
}

/// Two participants scheduled to meet, by identity.
///
/// Outcomes are always read from `first`'s side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing {
    pub first: String,
    pub second: String,
}

impl Pairing {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Whether the two sides have met before.
    pub fn is_rematch<T: Competitor>(first: &T, second: &T) -> bool {
        first.has_faced(second.id()) || second.has_faced(first.id())
    }
}

impl std::fmt::Display for Pairing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}

/// Splits `items` in half and pairs index `i` with index `i + len / 2`.
///
/// The caller guarantees an even length; a trailing odd element is left
/// unpaired.
pub fn half_split<T>(items: &[T]) -> Vec<(&T, &T)> {
    let half = items.len() / 2;
    items[..half].iter().zip(&items[half..half * 2]).collect()
}

/// First-round pairings for a roster already ordered by initial rank:
/// top half plays bottom half.
pub fn first_round<T: Competitor>(ranked: &[T]) -> Vec<Pairing> {
    half_split(ranked)
        .into_iter()
        .map(|(a, b)| Pairing::new(a.id(), b.id()))
        .collect()
}

/// Reads pairings off a sequence: positions (0, 1), (2, 3), ...
pub fn adjacent_pairs<T: Competitor>(sequence: &[T]) -> Vec<Pairing> {
    sequence
        .chunks_exact(2)
        .map(|pair| Pairing::new(pair[0].id(), pair[1].id()))
        .collect()
}
