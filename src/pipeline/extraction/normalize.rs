use crate::intelligence::reference::{IndicatorCatalog, IndicatorDefinition};

/// Resolve a raw label to its catalog entry.
///
/// 1. Exact, case-insensitive match on a canonical name or canonical label.
/// 2. Otherwise, in definition order, the first entry with an alias that
///    contains the label or is contained in it (case-insensitive).
///
/// Aliases only take part in the second pass, so a label resolves to the
/// *first* entry it fits: `MC` is mean corpuscular volume, and `MCHC`
/// is mean corpuscular hemoglobin because it contains the earlier `MCH`.
pub fn normalize_indicator_name<'c>(
    catalog: &'c IndicatorCatalog,
    raw_name: &str,
) -> Option<&'c IndicatorDefinition> {
    let raw = raw_name.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_lowercase();

    let exact = catalog.entries().iter().find(|def| {
        def.name.to_lowercase() == lower || def.canonical_label.to_lowercase() == lower
    });
    if exact.is_some() {
        return exact;
    }

    catalog.entries().iter().find(|def| {
        def.aliases.iter().any(|alias| {
            let alias = alias.to_lowercase();
            alias.contains(&lower) || lower.contains(&alias)
        })
    })
}
