//! Where announcements go.

use std::io::Write;
use swiss_engine::RoundPlan;

/// Receives the pairing lines of each round and the final standings.
pub trait Announcer {
    fn round(&mut self, plan: &RoundPlan) -> std::io::Result<()>;

    fn standings(&mut self, lines: &[String]) -> std::io::Result<()>;
}

/// Prints announcements to a writer, usually stdout.
pub struct ConsoleAnnouncer<W> {
    out: W,
}

impl<W: Write> ConsoleAnnouncer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Announcer for ConsoleAnnouncer<W> {
    fn round(&mut self, plan: &RoundPlan) -> std::io::Result<()> {
        writeln!(self.out, "{}", plan.name)?;
        for line in &plan.announcements {
            writeln!(self.out, "  {line}")?;
        }
        for rematch in &plan.report.rematches {
            writeln!(self.out, "  (rematch: {rematch})")?;
        }
        Ok(())
    }

    fn standings(&mut self, lines: &[String]) -> std::io::Result<()> {
        writeln!(self.out, "Final standings")?;
        for line in lines {
            writeln!(self.out, "  {line}")?;
        }
        Ok(())
    }
}

/// Keeps every announcement in memory.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    /// Pairing lines, one list per round.
    pub rounds: Vec<Vec<String>>,
    pub standings: Vec<String>,
}

impl Announcer for RecordingAnnouncer {
    fn round(&mut self, plan: &RoundPlan) -> std::io::Result<()> {
        self.rounds.push(plan.announcements.clone());
        Ok(())
    }

    fn standings(&mut self, lines: &[String]) -> std::io::Result<()> {
        self.standings = lines.to_vec();
        Ok(())
    }
}
