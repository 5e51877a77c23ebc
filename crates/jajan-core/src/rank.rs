//! Proximity ranking: radius cutoff, distance ordering, page truncation.

use crate::geo::{distance_meters, format_distance_label};
use crate::types::{Coordinate, Listing, RankedItem, ResultPage};

/// Turn filtered candidates into one page of results.
///
/// Without an origin, candidates keep loader order and carry no distance.
/// With an origin, candidates with an invalid location or beyond
/// `radius_meters` are dropped (a candidate exactly on the radius is kept),
/// the rest are stably sorted by ascending distance and labelled. In both
/// cases `has_more` reports whether more than `page_size` candidates
/// survived before truncation. The returned page carries no cursor.
#[must_use]
pub fn rank<R: Listing>(
    candidates: Vec<R>,
    origin: Option<Coordinate>,
    radius_meters: f64,
    page_size: usize,
) -> ResultPage<R> {
    let Some(origin) = origin else {
        return unranked_page(candidates, page_size);
    };

    let mut in_range = within_radius(candidates, origin, radius_meters);
    // `sort_by` is stable: equal distances keep their loader order.
    in_range.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    labelled_page(in_range, page_size)
}

/// Candidates with a valid location within `radius_meters` of `origin`,
/// paired with their distance, in input order.
pub(crate) fn within_radius<R: Listing>(
    candidates: Vec<R>,
    origin: Coordinate,
    radius_meters: f64,
) -> Vec<(f64, R)> {
    candidates
        .into_iter()
        .filter(|candidate| candidate.location().is_valid())
        .map(|candidate| (distance_meters(origin, candidate.location()), candidate))
        .filter(|(distance, _)| *distance <= radius_meters)
        .collect()
}

/// Truncate already-ordered candidates to a page, without labels.
pub(crate) fn unranked_page<R>(candidates: Vec<R>, page_size: usize) -> ResultPage<R> {
    let has_more = candidates.len() > page_size;
    let items = candidates
        .into_iter()
        .take(page_size)
        .map(|record| RankedItem {
            record,
            distance_label: None,
        })
        .collect();
    ResultPage {
        items,
        has_more,
        next_cursor: None,
    }
}

/// Truncate distance-sorted candidates to a page and label each one.
pub(crate) fn labelled_page<R>(sorted: Vec<(f64, R)>, page_size: usize) -> ResultPage<R> {
    let has_more = sorted.len() > page_size;
    let items = sorted
        .into_iter()
        .take(page_size)
        .map(|(distance, record)| RankedItem {
            record,
            distance_label: Some(format_distance_label(distance)),
        })
        .collect();
    ResultPage {
        items,
        has_more,
        next_cursor: None,
    }
}
