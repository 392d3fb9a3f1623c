use crate::error::AlignError;
use crate::models::{Alignment, VoteTable};
use std::collections::HashMap;

/// Agreement of every other entity with `reference` over the table's rows.
///
/// Runs column-wise: each entity column is zipped once against the reference
/// column, counting positions where both cast a vote and where the interned
/// values match. A row where the reference vote is missing therefore
/// contributes to no pair at all. Pure function of its arguments.
pub fn compute_alignment(
    table: &VoteTable,
    reference: &str,
) -> Result<HashMap<String, Alignment>, AlignError> {
    let reference_index = table
        .entity_index(reference)
        .ok_or_else(|| AlignError::EntityNotFound(reference.to_string()))?;
    let reference_column = table.column(reference_index);

    let mut results = HashMap::new();
    for (index, entity) in table.entities().iter().enumerate() {
        if index == reference_index {
            continue;
        }

        let mut votes = 0u32;
        let mut agreements = 0u32;
        for (reference_vote, other_vote) in reference_column.iter().zip(table.column(index)) {
            if let (Some(a), Some(b)) = (reference_vote, other_vote) {
                votes += 1;
                if a == b {
                    agreements += 1;
                }
            }
        }

        // Undefined fraction exactly when there was nothing comparable.
        let fraction = if votes > 0 {
            Some(f64::from(agreements) / f64::from(votes))
        } else {
            None
        };
        results.insert(entity.clone(), Alignment { fraction, votes });
    }
    Ok(results)
}
