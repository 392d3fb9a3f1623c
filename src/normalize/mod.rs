//! Entity-name cleanup that runs before the alignment core ever sees the
//! table: header trimming, canonical names for known aliases and historical
//! renames, and a fuzzy lookup used to suggest corrections when a requested
//! entity does not exist.

/// Known aliases and historical renames, folded to one canonical column name.
const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("BOLIVIA (PLURINATIOANL STATE OF)", "BOLIVIA (PLURINATIONAL STATE OF)"),
    ("VENEZUELA", "VENEZUELA (BOLIVARIAN REPUBLIC OF)"),
    ("BURMA", "MYANMAR"),
    ("CZECH REPUBLIC", "CZECHIA"),
    ("SWAZILAND", "ESWATINI"),
    ("TÜRKIYE", "TURKEY"),
    ("CAPE VERDE", "CABO VERDE"),
    ("EAST TIMOR", "TIMOR-LESTE"),
    ("CONGO (DEMOCRATIC REPUBLIC OF)", "DEMOCRATIC REPUBLIC OF THE CONGO"),
    ("ZAIRE", "DEMOCRATIC REPUBLIC OF THE CONGO"),
    ("DEMOCRATIC KAMPUCHEA", "CAMBODIA"),
    ("KHMER REPUBLIC", "CAMBODIA"),
];

/// Canonical form of an entity column name: trimmed, with known aliases
/// folded. Unknown names pass through unchanged (apart from trimming).
pub fn canonical_name(name: &str) -> &str {
    let trimmed = name.trim();
    CANONICAL_NAMES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(trimmed)
}

/// Case-insensitive substring match over the table's entity columns, used to
/// build a "did you mean" hint when an entity lookup fails.
pub fn similar_entities<'a>(entities: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_uppercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entities
        .iter()
        .filter(|entity| entity.to_uppercase().contains(&needle))
        .map(|entity| entity.as_str())
        .collect()
}
