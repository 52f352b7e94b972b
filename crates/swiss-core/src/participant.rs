//! Tournament participants and their mutable standing.

use crate::{parse_date, Category, InputError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered competitor.
///
/// The last name is the participant's identity inside a tournament: it is
/// what opponent histories record and what pairings refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: NaiveDate,
    pub category: Category,
    /// Current rank. A permutation of 1..=N after every ranking pass.
    pub rank: u32,
    /// Accumulated points, in half-point steps.
    pub score: f64,
    /// Identities of opponents already met, in playing order.
    pub opponents: Vec<String>,
}

impl Participant {
    /// Creates a participant with no score and no opponents.
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        date_of_birth: NaiveDate,
        category: Category,
        rank: u32,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            date_of_birth,
            category,
            rank,
            score: 0.0,
            opponents: Vec::new(),
        }
    }

    /// Builds a participant from raw roster fields as typed by a user.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] for an empty last name, a malformed date,
    /// an unknown category or a rank that is not a non-negative integer.
    pub fn parse(
        last_name: &str,
        first_name: &str,
        date_of_birth: &str,
        category: &str,
        rank: &str,
    ) -> Result<Self, InputError> {
        let last_name = last_name.trim();
        if last_name.is_empty() {
            return Err(InputError::Empty("last name"));
        }
        let date_of_birth = parse_date(date_of_birth)?;
        let category = category.parse::<Category>()?;
        let rank = rank
            .trim()
            .parse::<u32>()
            .map_err(|_| InputError::number("rank", rank))?;

        Ok(Self::new(
            last_name,
            first_name.trim(),
            date_of_birth,
            category,
            rank,
        ))
    }

    /// Identity used in pairings and opponent histories.
    #[inline]
    pub fn id(&self) -> &str {
        &self.last_name
    }

    /// Whether `opponent` already appears in this participant's history.
    pub fn has_faced(&self, opponent: &str) -> bool {
        self.opponents.iter().any(|o| o == opponent)
    }

    /// Number of matches played so far.
    pub fn matches_played(&self) -> usize {
        self.opponents.len()
    }

    /// Adds points from one match and records the opponent.
    pub fn record_match(&mut self, opponent: &str, points: f64) {
        self.score += points;
        self.opponents.push(opponent.to_string());
    }

    /// Returns a displayable view in the requested form.
    pub fn view(&self, form: Form) -> ParticipantView<'_> {
        ParticipantView {
            participant: self,
            form,
        }
    }
}

/// How much of a participant to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Form {
    /// Last name only, used in announcements.
    #[default]
    Short,
    /// Name, rank, score and opponent history.
    Long,
}

/// A participant rendered in a given [`Form`].
pub struct ParticipantView<'a> {
    participant: &'a Participant,
    form: Form,
}

impl std::fmt::Display for ParticipantView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.participant;
        match self.form {
            Form::Short => f.write_str(&p.last_name),
            Form::Long => write!(
                f,
                "{} {} (rank {}, {} pts, faced: [{}])",
                p.last_name,
                p.first_name,
                p.rank,
                p.score,
                p.opponents.join(", ")
            ),
        }
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.view(Form::Long).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carlsen() -> Participant {
        Participant::parse("Carlsen", "Magnus", "1990/11/30", "men", "1").unwrap()
    }

    #[test]
    fn test_parse_valid_entry() {
        let p = carlsen();
        assert_eq!(p.id(), "Carlsen");
        assert_eq!(p.first_name, "Magnus");
        assert_eq!(p.date_of_birth, NaiveDate::from_ymd_opt(1990, 11, 30).unwrap());
        assert_eq!(p.category, Category::Men);
        assert_eq!(p.rank, 1);
        assert_eq!(p.score, 0.0);
        assert!(p.opponents.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        assert_eq!(
            Participant::parse("", "Magnus", "1990/11/30", "men", "1"),
            Err(InputError::Empty("last name"))
        );
        assert!(matches!(
            Participant::parse("Carlsen", "Magnus", "30/11/1990", "men", "1"),
            Err(InputError::InvalidDate(_))
        ));
        assert!(matches!(
            Participant::parse("Carlsen", "Magnus", "1990-11-30", "male", "1"),
            Err(InputError::UnknownCategory(_))
        ));
        assert!(matches!(
            Participant::parse("Carlsen", "Magnus", "1990-11-30", "MEN", "first"),
            Err(InputError::InvalidNumber { field: "rank", .. })
        ));
    }

    #[test]
    fn test_record_match_keeps_history_in_step_with_score() {
        let mut p = carlsen();
        p.record_match("Nakamura", 1.0);
        p.record_match("Caruana", 0.5);

        assert_eq!(p.score, 1.5);
        assert_eq!(p.matches_played(), 2);
        assert!(p.has_faced("Nakamura"));
        assert!(p.has_faced("Caruana"));
        assert!(!p.has_faced("Ding"));
    }

    #[test]
    fn test_short_and_long_forms() {
        let mut p = carlsen();
        p.record_match("Nakamura", 1.0);

        assert_eq!(p.view(Form::Short).to_string(), "Carlsen");
        assert_eq!(
            p.view(Form::Long).to_string(),
            "Carlsen Magnus (rank 1, 1 pts, faced: [Nakamura])"
        );
        // Rendering never changes the value itself.
        assert_eq!(p.to_string(), p.view(Form::Long).to_string());
    }
}
