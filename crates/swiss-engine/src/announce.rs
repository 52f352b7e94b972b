//! Human-readable pairing and standings lines.

use swiss_core::{Form, Participant};

/// `"<first> will meet <second>"`, both in short form.
pub fn pairing_line(first: &Participant, second: &Participant) -> String {
    format!(
        "{} will meet {}",
        first.view(Form::Short),
        second.view(Form::Short)
    )
}

/// `"<participant> is number <rank>"` for each participant, in the order
/// given.
pub fn standing_lines(ranked: &[Participant]) -> Vec<String> {
    ranked
        .iter()
        .map(|p| format!("{} is number {}", p.view(Form::Short), p.rank))
        .collect()
}
