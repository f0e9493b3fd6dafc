use crate::models::RecommendationCandidate;

/// Maximum number of candidates taken from one model response
pub const MAX_CANDIDATES: usize = 3;

const ENUMERATORS: [&str; 3] = ["1.", "2.", "3."];

/// Parses generative model output into ranked recommendation candidates
///
/// Expected line format is `N. TITLE | REASON`. Lines without a `|`, or whose
/// title or reason is empty after trimming, are skipped. Output order follows
/// input order, which is the model's stated preference.
pub fn parse_recommendations(raw: &str) -> Vec<RecommendationCandidate> {
    raw.lines()
        .filter_map(parse_line)
        .take(MAX_CANDIDATES)
        .collect()
}

fn parse_line(line: &str) -> Option<RecommendationCandidate> {
    let line = line.trim();
    if line.is_empty() || !line.contains('|') {
        return None;
    }

    let body = ENUMERATORS
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .map(str::trim)
        .unwrap_or(line);

    let (title, reason) = body.split_once('|')?;
    let (title, reason) = (title.trim(), reason.trim());
    if title.is_empty() || reason.is_empty() {
        return None;
    }

    Some(RecommendationCandidate::new(title, reason))
}
