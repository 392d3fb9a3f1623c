use crate::models::{Alignment, RankedEntry};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Top-N closest ("allies") and most-opposed ("enemies") entities from a set
/// of alignment results.
///
/// Only entities with a defined fraction and at least `min_votes` comparable
/// votes qualify. Enemies are the tail of the same descending sort, reported
/// worst first. When `top_n` exceeds half the qualifying set, the two lists
/// overlap; that is intentional and left as-is.
pub fn find_allies_and_enemies(
    alignments: &HashMap<String, Alignment>,
    top_n: usize,
    min_votes: u32,
) -> (Vec<RankedEntry>, Vec<RankedEntry>) {
    let mut qualifying: Vec<RankedEntry> = alignments
        .iter()
        .filter(|(_, alignment)| alignment.votes >= min_votes)
        .filter_map(|(entity, alignment)| {
            alignment.fraction.map(|fraction| RankedEntry {
                entity: entity.clone(),
                fraction,
                votes: alignment.votes,
            })
        })
        .collect();

    // Descending by fraction; equal fractions order by entity name so the
    // outcome never depends on map iteration order.
    qualifying.sort_by(|a, b| {
        b.fraction
            .partial_cmp(&a.fraction)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entity.cmp(&b.entity))
    });

    let allies: Vec<RankedEntry> = qualifying.iter().take(top_n).cloned().collect();

    let tail_start = qualifying.len().saturating_sub(top_n);
    let mut enemies: Vec<RankedEntry> = qualifying[tail_start..].to_vec();
    enemies.reverse();

    (allies, enemies)
}
