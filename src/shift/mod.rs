use crate::alignment::compute_alignment;
use crate::error::AlignError;
use crate::models::{ShiftDirection, ShiftResult, VoteTable};
use chrono::NaiveDateTime;
use log::debug;

/// Find the entity whose alignment with `reference` moved the most between
/// the two halves of `[start, end]`.
///
/// The window splits at the exact midpoint timestamp `start + (end-start)/2`;
/// the first half is `[start, midpoint)` and the second `[midpoint, end]`, so
/// a row on the midpoint counts once, in the second half. An entity only
/// qualifies with a defined fraction and at least `min_votes` comparable
/// votes in BOTH halves. Returns `Ok(None)` when nothing qualifies.
pub fn analyze_alignment_shift(
    table: &VoteTable,
    reference: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    min_votes: u32,
) -> Result<Option<ShiftResult>, AlignError> {
    let midpoint = start + (end - start) / 2;
    let first_half = table.filter_rows(|date| start <= date && date < midpoint);
    let second_half = table.filter_rows(|date| midpoint <= date && date <= end);
    debug!(
        "shift split at {}: {} rows in first half, {} in second",
        midpoint,
        first_half.len(),
        second_half.len()
    );

    let first = compute_alignment(&first_half, reference)?;
    let second = compute_alignment(&second_half, reference)?;

    // Signed shifts for entities measurable in both halves, in entity-name
    // order so max/min selection is deterministic under exact float ties.
    let mut shifts: Vec<(&String, f64, f64, f64, u32, u32)> = Vec::new();
    for (entity, before) in &first {
        let Some(after) = second.get(entity) else {
            continue;
        };
        if before.votes < min_votes || after.votes < min_votes {
            continue;
        }
        if let (Some(first_fraction), Some(second_fraction)) = (before.fraction, after.fraction) {
            shifts.push((
                entity,
                second_fraction - first_fraction,
                first_fraction,
                second_fraction,
                before.votes,
                after.votes,
            ));
        }
    }
    if shifts.is_empty() {
        return Ok(None);
    }
    shifts.sort_by(|a, b| a.0.cmp(b.0));

    let mut largest_gain = &shifts[0];
    let mut largest_drop = &shifts[0];
    for shift in &shifts[1..] {
        if shift.1 > largest_gain.1 {
            largest_gain = shift;
        }
        if shift.1 < largest_drop.1 {
            largest_drop = shift;
        }
    }

    // Equal magnitudes resolve in favor of the positive shift. Arbitrary,
    // but long-standing behavior that downstream reports rely on.
    let (chosen, direction) = if largest_gain.1.abs() >= largest_drop.1.abs() {
        (largest_gain, ShiftDirection::Positive)
    } else {
        (largest_drop, ShiftDirection::Negative)
    };

    Ok(Some(ShiftResult {
        entity: chosen.0.clone(),
        direction,
        shift: chosen.1,
        first_fraction: chosen.2,
        second_fraction: chosen.3,
        first_votes: chosen.4,
        second_votes: chosen.5,
    }))
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

    // Reference always votes "Y"; agreement is a "Y", disagreement an "N".
    fn vote(agree: bool) -> Option<&'static str> {
        if agree {
            Some("Y")
        } else {
            Some("N")
        }
    }

    /// First half: X agrees 9/30 (0.30), Y agrees 18/30 (0.60).
    /// Second half: X agrees 20/25 (0.80), Y agrees 11/20 (0.55).
    fn shifting_table() -> VoteTable {
        let mut table = VoteTable::new(vec!["REF".into(), "X".into(), "Y".into()]);
        for i in 0..30 {
            table.push_record(at("2000-02-01"), &[Some("Y"), vote(i < 9), vote(i < 18)]);
        }
        for i in 0..30 {
            let x = if i < 25 { vote(i < 20) } else { None };
            let y = if i < 20 { vote(i < 11) } else { None };
            table.push_record(at("2000-09-01"), &[Some("Y"), x, y]);
        }
        table
    }

    #[test]
    fn reports_the_largest_magnitude_shift() {
        let table = shifting_table();
        let result =
            analyze_alignment_shift(&table, "REF", at("2000-01-01"), at("2000-12-31"), 20)
                .unwrap()
                .expect("X qualifies in both halves");

        assert_eq!(result.entity, "X");
        assert_eq!(result.direction, ShiftDirection::Positive);
        assert!((result.shift - 0.50).abs() < 1e-12);
        assert!((result.first_fraction - 0.30).abs() < 1e-12);
        assert!((result.second_fraction - 0.80).abs() < 1e-12);
        assert_eq!(result.first_votes, 30);
        assert_eq!(result.second_votes, 25);
    }

    #[test]
    fn entities_below_threshold_in_either_half_do_not_qualify() {
        let table = shifting_table();
        // Second-half counts are 25 (X) and 20 (Y); min_votes=26 knocks
        // both out even though their first halves have 30.
        let result =
            analyze_alignment_shift(&table, "REF", at("2000-01-01"), at("2000-12-31"), 26)
                .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn midpoint_row_lands_in_the_second_half() {
        let mut table = VoteTable::new(vec!["REF".into(), "A".into()]);
        table.push_record(at("2000-01-01"), &[Some("Y"), Some("N")]);
        // Midpoint of [2000-01-01, 2000-01-03] is exactly 2000-01-02 00:00.
        table.push_record(at("2000-01-02"), &[Some("Y"), Some("Y")]);
        table.push_record(at("2000-01-03"), &[Some("Y"), Some("Y")]);

        let result = analyze_alignment_shift(&table, "REF", at("2000-01-01"), at("2000-01-03"), 1)
            .unwrap()
            .unwrap();
        assert_eq!(result.first_votes, 1);
        assert_eq!(result.second_votes, 2);
        assert_eq!(result.first_fraction, 0.0);
        assert_eq!(result.second_fraction, 1.0);
    }

    #[test]
    fn equal_magnitudes_favor_the_positive_shift() {
        let mut table = VoteTable::new(vec!["REF".into(), "UP".into(), "DOWN".into()]);
        // First half: UP at 0.0, DOWN at 1.0. Second half: reversed.
        for _ in 0..2 {
            table.push_record(at("2000-02-01"), &[Some("Y"), Some("N"), Some("Y")]);
            table.push_record(at("2000-09-01"), &[Some("Y"), Some("Y"), Some("N")]);
        }

        let result = analyze_alignment_shift(&table, "REF", at("2000-01-01"), at("2000-12-31"), 1)
            .unwrap()
            .unwrap();
        assert_eq!(result.entity, "UP");
        assert_eq!(result.direction, ShiftDirection::Positive);
        assert_eq!(result.shift, 1.0);
    }

    #[test]
    fn empty_window_propagates_as_absent_result() {
        let table = shifting_table();
        let result =
            analyze_alignment_shift(&table, "REF", at("1990-01-01"), at("1990-12-31"), 1)
                .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let table = shifting_table();
        assert!(matches!(
            analyze_alignment_shift(&table, "NOWHERE", at("2000-01-01"), at("2000-12-31"), 1),
            Err(AlignError::EntityNotFound(_))
        ));
    }
}
