//! Radon-style complexity and maintainability reports.
//!
//! Two JSON shapes are normalized into one rank tally:
//! - cyclomatic complexity (`radon cc -j`): module → list of blocks, each
//!   block carrying a `rank` letter A-F.
//! - maintainability index (`radon mi -j`): module → object carrying a
//!   `rank` letter A-C.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};

pub const RANKS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

// ---------------------------------------------------------------------------
// RankTally
// ---------------------------------------------------------------------------

/// Counts of blocks or modules per rank letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTally {
    pub counts: [u32; 6],
}

impl RankTally {
    fn index_of(rank: char) -> Option<usize> {
        RANKS.iter().position(|r| *r == rank)
    }

    pub fn count(&self, rank: char) -> u32 {
        Self::index_of(rank).map(|i| self.counts[i]).unwrap_or(0)
    }

    fn add(&mut self, rank: &str, path: &str) -> Result<()> {
        let rank_char = rank.chars().next().unwrap_or(' ');
        let index = (rank.len() == 1)
            .then(|| Self::index_of(rank_char))
            .flatten()
            .ok_or_else(|| DashboardError::MalformedReport {
                path: path.to_string(),
                reason: format!("unknown rank '{rank}'"),
            })?;
        self.counts[index] += 1;
        Ok(())
    }

    /// Every rank strictly worse than `max_rank` must be empty.
    pub fn ok_within(&self, max_rank: char) -> bool {
        match Self::index_of(max_rank) {
            Some(max) => self.counts[max + 1..].iter().all(|c| *c == 0),
            None => false,
        }
    }

    /// Worst non-empty rank, if anything was measured.
    pub fn worst_rank(&self) -> Option<char> {
        RANKS
            .iter()
            .enumerate()
            .rev()
            .find(|(i, _)| self.counts[*i] > 0)
            .map(|(_, r)| *r)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    /// Parse a cyclomatic-complexity JSON report (module → block list).
    pub fn from_cc_json(data: &str, path: &str) -> Result<RankTally> {
        #[derive(Deserialize)]
        struct Block {
            rank: String,
        }
        let modules: std::collections::HashMap<String, Vec<Block>> = serde_json::from_str(data)
            .map_err(|e| DashboardError::MalformedReport {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let mut tally = RankTally::default();
        for blocks in modules.values() {
            for block in blocks {
                tally.add(&block.rank, path)?;
            }
        }
        Ok(tally)
    }

    /// Parse a maintainability-index JSON report (module → `{rank, mi}`).
    pub fn from_mi_json(data: &str, path: &str) -> Result<RankTally> {
        #[derive(Deserialize)]
        struct Entry {
            rank: String,
        }
        let modules: std::collections::HashMap<String, Entry> = serde_json::from_str(data)
            .map_err(|e| DashboardError::MalformedReport {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let mut tally = RankTally::default();
        for entry in modules.values() {
            tally.add(&entry.rank, path)?;
        }
        Ok(tally)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cc_report_tally() {
        let data = r#"{
            "src/server.py": [
                {"name": "handle", "rank": "A", "complexity": 3},
                {"name": "dispatch", "rank": "C", "complexity": 12}
            ],
            "src/worker.py": [
                {"name": "process", "rank": "F", "complexity": 44}
            ]
        }"#;
        let tally = RankTally::from_cc_json(data, "worker.cc.json").unwrap();
        assert_eq!(tally.count('A'), 1);
        assert_eq!(tally.count('C'), 1);
        assert_eq!(tally.count('F'), 1);
        assert_eq!(tally.total(), 3);
        assert!(!tally.ok_within('C'));
        assert_eq!(tally.worst_rank(), Some('F'));
    }

    #[test]
    fn mi_report_tally() {
        let data = r#"{
            "src/server.py": {"mi": 87.2, "rank": "A"},
            "src/worker.py": {"mi": 64.1, "rank": "B"}
        }"#;
        let tally = RankTally::from_mi_json(data, "worker.mi.json").unwrap();
        assert_eq!(tally.count('A'), 1);
        assert_eq!(tally.count('B'), 1);
        assert!(!tally.ok_within('A'));
        assert!(tally.ok_within('B'));
    }

    #[test]
    fn clean_report_passes_gate() {
        let data = r#"{"src/a.py": [{"rank": "A"}, {"rank": "B"}]}"#;
        let tally = RankTally::from_cc_json(data, "a.cc.json").unwrap();
        assert!(tally.ok_within('C'));
        assert_eq!(tally.worst_rank(), Some('B'));
    }

    #[test]
    fn empty_report_is_ok() {
        let tally = RankTally::from_cc_json("{}", "a.cc.json").unwrap();
        assert_eq!(tally.total(), 0);
        assert!(tally.ok_within('A'));
        assert_eq!(tally.worst_rank(), None);
    }

    #[test]
    fn unknown_rank_is_malformed() {
        let data = r#"{"src/a.py": [{"rank": "Z"}]}"#;
        let err = RankTally::from_cc_json(data, "a.cc.json").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedReport { .. }));
    }

    #[test]
    fn garbage_json_is_malformed() {
        let err = RankTally::from_mi_json("not json", "a.mi.json").unwrap_err();
        assert!(matches!(err, DashboardError::MalformedReport { .. }));
    }
}
