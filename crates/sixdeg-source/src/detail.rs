//! Read models returned by [`MemorySource`](crate::MemorySource) lookups

use serde::{Deserialize, Serialize};
use sixdeg_core::Entity;

/// A group with its resolved members, in dataset order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetail {
    pub id: u64,
    pub title: String,
    pub members: Vec<Entity>,
}

/// A location with the entities living there, ordered by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub id: u64,
    pub name: String,
    pub residents: Vec<Entity>,
}

/// One page of a name search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePage {
    /// Matches across all pages
    pub count: usize,

    /// 1-based page number of this page
    pub page: usize,

    pub next_page: Option<usize>,
    pub previous_page: Option<usize>,
    pub results: Vec<Entity>,
}

impl NamePage {
    /// Cut page `page` (1-based) of `per_page` items out of `matches`
    ///
    /// Page 0 is treated as page 1. A page past the end is empty and links
    /// back to the last page.
    pub fn slice(matches: Vec<Entity>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let count = matches.len();
        let pages = count.div_ceil(per_page);

        let results: Vec<Entity> = matches
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Self {
            count,
            page,
            next_page: (page < pages).then_some(page + 1),
            previous_page: (page > 1).then(|| (page - 1).min(pages.max(1))),
            results,
        }
    }

    /// Total number of pages
    pub fn pages(&self, per_page: usize) -> usize {
        self.count.div_ceil(per_page.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: u64) -> Vec<Entity> {
        (1..=n).map(|i| Entity::new(i, format!("e{}", i))).collect()
    }

    #[test]
    fn test_slice_middle_page() {
        let page = NamePage::slice(entities(25), 2, 10);

        assert_eq!(page.count, 25);
        assert_eq!(page.results.len(), 10);
        assert_eq!(page.results[0].name, "e11");
        assert_eq!(page.next_page, Some(3));
        assert_eq!(page.previous_page, Some(1));
        assert_eq!(page.pages(10), 3);
    }

    #[test]
    fn test_slice_edges() {
        let last = NamePage::slice(entities(25), 3, 10);
        assert_eq!(last.results.len(), 5);
        assert_eq!(last.next_page, None);

        let first = NamePage::slice(entities(25), 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.previous_page, None);

        let past = NamePage::slice(entities(5), 4, 10);
        assert!(past.results.is_empty());
        assert_eq!(past.next_page, None);
        assert_eq!(past.previous_page, Some(1));

        let empty = NamePage::slice(Vec::new(), 1, 10);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.next_page, None);
        assert_eq!(empty.previous_page, None);
    }
}
