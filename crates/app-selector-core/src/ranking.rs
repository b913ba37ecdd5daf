//! Display ordering of candidates.
//!
//! Candidates are ordered best first:
//! 1. applications installed by the user before preloaded ones,
//! 2. higher usage score first,
//! 3. descending application id as a final tie-break.
//!
//! The order is total over distinct application ids, so ranking is
//! idempotent and independent of the input order.

use std::cmp::Ordering;

use crate::candidate::Candidate;

/// Score difference between two consecutive usage-statistics matches.
pub const SCORE_STEP: i32 = 10;

/// Score given to the first usage-statistics match for `count` candidates.
pub fn base_score(count: usize) -> i32 {
    i32::try_from(count.saturating_add(1))
        .unwrap_or(i32::MAX)
        .saturating_mul(SCORE_STEP)
}

/// Total order used for display, "best first".
pub fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    a.is_preloaded()
        .cmp(&b.is_preloaded())
        .then_with(|| b.score().cmp(&a.score()))
        .then_with(|| b.appid().cmp(a.appid()))
}

/// Credits candidates found in a usage-statistics enumeration.
///
/// `tags` is walked in the order the statistics service reports them, most
/// relevant first. The first candidate matching a tag gets the current base
/// score, and the base drops by [`SCORE_STEP`] after every match. Tags that
/// match nothing do not consume a step.
///
/// Returns the number of credited candidates.
pub fn apply_usage_scores<I>(candidates: &mut [Candidate], tags: I) -> usize
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut next = base_score(candidates.len());
    let mut credited = 0;

    for tag in tags {
        let tag = tag.as_ref();
        if let Some(candidate) = candidates.iter_mut().find(|c| c.appid() == tag) {
            log::trace!("usage score {} for {}", next, tag);
            candidate.add_score(next);
            next = next.saturating_sub(SCORE_STEP);
            credited += 1;
        }
    }

    credited
}

/// Sorts candidates into display order and assigns their positions.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(compare);
    for (position, candidate) in candidates.iter_mut().enumerate() {
        candidate.set_position(position);
    }
    candidates
}

/// Checks that `candidates` is in display order with positions `0..N`.
pub fn is_ranked(candidates: &[Candidate]) -> bool {
    let positions_match = candidates
        .iter()
        .enumerate()
        .all(|(i, c)| c.position() == Some(i));
    positions_match
        && candidates
            .windows(2)
            .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}
