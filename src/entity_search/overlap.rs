// WHY: Phase 2 walk over sorted candidates; collapses intersecting spans to the longest alias

use super::position::SearchResultPosition;

/// Lazy adapter yielding non-overlapping candidates in ascending start order
///
/// Input must be sorted by start offset. On overlap the strictly longer alias (by characters)
/// replaces the current candidate; on equal length the current one (earlier start) is kept.
pub struct OverlapResolver<'a, I>
where
    I: Iterator<Item = SearchResultPosition<'a>>,
{
    sorted: I,
    current: Option<SearchResultPosition<'a>>,
}

impl<'a, I> OverlapResolver<'a, I>
where
    I: Iterator<Item = SearchResultPosition<'a>>,
{
    pub fn new(sorted: I) -> Self {
        Self { sorted, current: None }
    }
}

impl<'a, I> Iterator for OverlapResolver<'a, I>
where
    I: Iterator<Item = SearchResultPosition<'a>>,
{
    type Item = SearchResultPosition<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for next in self.sorted.by_ref() {
            match self.current.take() {
                None => self.current = Some(next),
                Some(current) if current.overlaps(&next) => {
                    self.current = Some(if next.char_len > current.char_len { next } else { current });
                }
                Some(current) => {
                    self.current = Some(next);
                    return Some(current);
                }
            }
        }
        self.current.take()
    }
}

/// Resolve a fully materialized candidate list
pub fn resolve_overlaps(sorted: Vec<SearchResultPosition<'_>>) -> Vec<SearchResultPosition<'_>> {
    OverlapResolver::new(sorted.into_iter()).collect()
}
