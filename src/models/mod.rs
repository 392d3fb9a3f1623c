use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// In-memory roll-call vote matrix: one row per resolution, one column per
/// voting entity. Stored column-major with interned vote categories so that
/// pairwise comparison is a single pass over two columns.
#[derive(Debug, Clone)]
pub struct VoteTable {
    dates: Vec<NaiveDateTime>,
    entities: Vec<String>,
    columns: Vec<Vec<Option<u16>>>,
    categories: Vec<String>,
}

impl VoteTable {
    pub fn new(entities: Vec<String>) -> Self {
        let columns = vec![Vec::new(); entities.len()];
        Self {
            dates: Vec::new(),
            entities,
            columns,
            categories: Vec::new(),
        }
    }

    /// Append one resolution. `votes` must hold one cell per entity column,
    /// in the same order as `entities`; `None` marks a missing vote.
    pub fn push_record(&mut self, date: NaiveDateTime, votes: &[Option<&str>]) {
        debug_assert_eq!(votes.len(), self.entities.len());
        self.dates.push(date);
        for (column, vote) in self.columns.iter_mut().zip(votes) {
            let id = vote.map(|value| match self.categories.iter().position(|c| c == value) {
                Some(id) => id as u16,
                None => {
                    self.categories.push(value.to_string());
                    (self.categories.len() - 1) as u16
                }
            });
            column.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn entity_index(&self, entity: &str) -> Option<usize> {
        self.entities.iter().position(|e| e == entity)
    }

    pub fn column(&self, index: usize) -> &[Option<u16>] {
        &self.columns[index]
    }

    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    /// Rows whose temporal key satisfies `start <= key <= end`, inclusive on
    /// both ends. Never mutates `self`; an empty result is valid.
    pub fn filter_period(&self, start: NaiveDateTime, end: NaiveDateTime) -> VoteTable {
        self.filter_rows(|date| start <= date && date <= end)
    }

    /// Row selection by arbitrary date predicate. The shift analyzer needs a
    /// half-open window, so the predicate stays general.
    pub fn filter_rows<F>(&self, keep: F) -> VoteTable
    where
        F: Fn(NaiveDateTime) -> bool,
    {
        let selected: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, date)| keep(**date))
            .map(|(row, _)| row)
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|column| selected.iter().map(|&row| column[row]).collect())
            .collect();

        VoteTable {
            dates: selected.iter().map(|&row| self.dates[row]).collect(),
            entities: self.entities.clone(),
            columns,
            categories: self.categories.clone(),
        }
    }
}

/// Agreement of one entity with the reference entity over a window.
/// `fraction` is `None` exactly when there was no resolution where both cast
/// a non-missing vote (`votes == 0`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub fraction: Option<f64>,
    pub votes: u32,
}

/// One row of a ranked allies/enemies list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub entity: String,
    pub fraction: f64,
    pub votes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftDirection {
    Positive,
    Negative,
}

impl fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftDirection::Positive => write!(f, "positive"),
            ShiftDirection::Negative => write!(f, "negative"),
        }
    }
}

/// Largest alignment change between the two halves of an analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftResult {
    pub entity: String,
    pub direction: ShiftDirection,
    pub shift: f64,
    pub first_fraction: f64,
    pub second_fraction: f64,
    pub first_votes: u32,
    pub second_votes: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn sample_table() -> VoteTable {
        let mut table = VoteTable::new(vec!["FRANCE".into(), "GHANA".into()]);
        table.push_record(at("2000-01-01"), &[Some("Y"), Some("N")]);
        table.push_record(at("2000-06-15"), &[Some("N"), None]);
        table.push_record(at("2000-12-31"), &[Some("Y"), Some("Y")]);
        table.push_record(at("2001-01-01"), &[Some("A"), Some("A")]);
        table
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let table = sample_table();
        let window = table.filter_period(at("2000-01-01"), at("2000-12-31"));
        assert_eq!(window.len(), 3);
        assert_eq!(window.dates()[0], at("2000-01-01"));
        assert_eq!(window.dates()[2], at("2000-12-31"));
    }

    #[test]
    fn filter_excludes_rows_outside_bounds() {
        let table = sample_table();
        let window = table.filter_period(at("2000-01-02"), at("2000-12-30"));
        assert_eq!(window.len(), 1);
        assert_eq!(window.dates()[0], at("2000-06-15"));
    }

    #[test]
    fn filter_is_idempotent() {
        let table = sample_table();
        let once = table.filter_period(at("2000-01-01"), at("2000-12-31"));
        let twice = once.filter_period(at("2000-01-01"), at("2000-12-31"));
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.dates(), twice.dates());
        for index in 0..once.entities().len() {
            assert_eq!(once.column(index), twice.column(index));
        }
    }

    #[test]
    fn empty_window_is_valid() {
        let table = sample_table();
        let window = table.filter_period(at("1990-01-01"), at("1990-12-31"));
        assert!(window.is_empty());
        assert_eq!(window.entities(), table.entities());
    }

    #[test]
    fn equal_vote_values_intern_to_equal_ids() {
        let table = sample_table();
        let france = table.column(0);
        let ghana = table.column(1);
        // "Y" on both sides of row 2, "A" on both sides of row 3.
        assert_eq!(france[2], ghana[2]);
        assert_eq!(france[3], ghana[3]);
        assert_ne!(france[0], ghana[0]);
        assert_eq!(ghana[1], None);
    }
}
