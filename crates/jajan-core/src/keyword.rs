use crate::types::Listing;

/// Keep candidates whose name, type or description contains any keyword.
///
/// Matching is a case-insensitive substring test with OR semantics across
/// keywords. Blank keywords are ignored; with no usable keywords the input is
/// returned unchanged. Input order is preserved.
#[must_use]
pub fn filter_by_keywords<R: Listing>(candidates: Vec<R>, keywords: &[String]) -> Vec<R> {
    let needles: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    if needles.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|candidate| {
            let haystack = searchable_text(candidate);
            needles.iter().any(|needle| haystack.contains(needle.as_str()))
        })
        .collect()
}

fn searchable_text<R: Listing>(candidate: &R) -> String {
    format!(
        "{} {} {}",
        candidate.name(),
        candidate.category(),
        candidate.description().unwrap_or_default()
    )
    .to_lowercase()
}
