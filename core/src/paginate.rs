/*
    spotify-export-rs | Rust CLI tool to export your Spotify library to text indexes.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::exporter::ExportError;
use crate::source::Page;
use log::{debug, warn};
use std::future::Future;

/// Items requested per API call.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Upper bound on calls for a single collection (100k items at the default page size).
pub const DEFAULT_MAX_PAGES: u32 = 2_000;

/// Walks an offset/limit endpoint until the data runs out.
///
/// A walk ends on a short page, or once the next offset reaches the total the
/// server reported. `max_pages` bounds the walk against a server that keeps
/// returning full pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: u32,
    max_pages: u32,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_MAX_PAGES)
    }
}

impl Paginator {
    pub fn new(page_size: u32, max_pages: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Same page size, different page cap.
    pub fn with_max_pages(self, max_pages: u32) -> Self {
        Self::new(self.page_size, max_pages)
    }

    /// Fetches every page and maps each item, dropping those mapped to `None`.
    ///
    /// `fetch` receives `(offset, limit)`. The first error aborts the walk.
    pub async fn collect<T, U, F, Fut, M>(
        &self,
        label: &str,
        mut fetch: F,
        mut map: M,
    ) -> Result<Vec<U>, ExportError>
    where
        F: FnMut(u32, u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, ExportError>>,
        M: FnMut(T) -> Option<U>,
    {
        let mut collected = Vec::new();
        let mut offset = 0;

        for _ in 0..self.max_pages {
            let page = fetch(offset, self.page_size).await?;
            let last = self.is_last(offset, &page);
            collected.extend(page.items.into_iter().filter_map(&mut map));

            if last {
                return Ok(collected);
            }
            offset += self.page_size;
            debug!("{}: fetched {} items so far...", label, offset);
        }

        Err(ExportError::PageLimit {
            label: label.to_string(),
            max_pages: self.max_pages,
        })
    }

    /// Walks pages until `predicate` accepts an item, returning that item.
    ///
    /// Running out of pages, or out of the page budget, yields `None`.
    pub async fn find_first<T, F, Fut, P>(
        &self,
        label: &str,
        mut fetch: F,
        mut predicate: P,
    ) -> Result<Option<T>, ExportError>
    where
        F: FnMut(u32, u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, ExportError>>,
        P: FnMut(&T) -> bool,
    {
        let mut offset = 0;

        for _ in 0..self.max_pages {
            let page = fetch(offset, self.page_size).await?;
            let last = self.is_last(offset, &page);

            if let Some(found) = page.items.into_iter().find(|item| predicate(item)) {
                return Ok(Some(found));
            }
            if last {
                return Ok(None);
            }
            offset += self.page_size;
        }

        warn!(
            "{}: gave up after {} pages without a match",
            label, self.max_pages
        );
        Ok(None)
    }

    fn is_last<T>(&self, offset: u32, page: &Page<T>) -> bool {
        let received = page.items.len() as u32;
        received < self.page_size || offset.saturating_add(self.page_size) >= page.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Serves `sizes` as consecutive pages of sequential integers and records every offset asked for.
    fn paged(sizes: &[u32], total: u32) -> (Vec<Page<u32>>, RefCell<Vec<u32>>) {
        let mut next = 0;
        let pages = sizes
            .iter()
            .map(|&size| {
                let items = (next..next + size).collect();
                next += size;
                Page { items, total }
            })
            .collect();
        (pages, RefCell::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_collect_stops_on_short_page() {
        let (pages, offsets) = paged(&[50, 50, 13], 113);
        let paginator = Paginator::default();

        let items = paginator
            .collect(
                "test",
                |offset, limit| {
                    assert_eq!(limit, 50);
                    offsets.borrow_mut().push(offset);
                    let page = pages[(offset / limit) as usize].clone();
                    async move { Ok::<_, ExportError>(page) }
                },
                Some,
            )
            .await
            .unwrap();

        assert_eq!(*offsets.borrow(), vec![0, 50, 100]);
        assert_eq!(items.len(), 113);
        assert_eq!(items, (0..113).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_collect_trusts_total_on_exact_multiple() {
        let (pages, offsets) = paged(&[50, 50], 100);
        let paginator = Paginator::default();

        let items = paginator
            .collect(
                "test",
                |offset, limit| {
                    offsets.borrow_mut().push(offset);
                    let page = pages[(offset / limit) as usize].clone();
                    async move { Ok::<_, ExportError>(page) }
                },
                Some,
            )
            .await
            .unwrap();

        assert_eq!(*offsets.borrow(), vec![0, 50]);
        assert_eq!(items.len(), 100);
    }

    #[tokio::test]
    async fn test_collect_empty_collection() {
        let paginator = Paginator::default();
        let items: Vec<u32> = paginator
            .collect(
                "test",
                |_, _| async {
                    Ok::<_, ExportError>(Page {
                        items: Vec::<u32>::new(),
                        total: 0,
                    })
                },
                Some,
            )
            .await
            .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_collect_drops_unmapped_items() {
        let paginator = Paginator::new(3, 10);
        let items = paginator
            .collect(
                "test",
                |offset, _| async move {
                    let items = match offset {
                        0 => vec![Some("a"), None, Some("b")],
                        _ => vec![None, Some("c")],
                    };
                    Ok::<_, ExportError>(Page { items, total: 5 })
                },
                |item: Option<&str>| item.map(str::to_uppercase),
            )
            .await
            .unwrap();

        assert_eq!(items, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_collect_fails_on_endless_full_pages() {
        let calls = RefCell::new(0);
        let paginator = Paginator::new(2, 5);

        let result: Result<Vec<u32>, _> = paginator
            .collect(
                "endless",
                |_, _| {
                    *calls.borrow_mut() += 1;
                    async {
                        Ok::<_, ExportError>(Page {
                            items: vec![1u32, 2],
                            total: u32::MAX,
                        })
                    }
                },
                Some,
            )
            .await;

        assert!(matches!(
            result,
            Err(ExportError::PageLimit { max_pages: 5, .. })
        ));
        assert_eq!(*calls.borrow(), 5);
    }

    #[tokio::test]
    async fn test_collect_propagates_fetch_error() {
        let paginator = Paginator::default();
        let result: Result<Vec<u32>, _> = paginator
            .collect(
                "broken",
                |offset, _| async move {
                    if offset == 0 {
                        Ok::<_, ExportError>(Page {
                            items: (0..50).collect(),
                            total: 200,
                        })
                    } else {
                        Err(ExportError::InvalidId("boom".to_string()))
                    }
                },
                Some,
            )
            .await;

        assert!(matches!(result, Err(ExportError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_find_first_stops_at_match() {
        let (pages, offsets) = paged(&[50, 50, 50, 7], 157);
        let paginator = Paginator::default();

        let found = paginator
            .find_first(
                "test",
                |offset, limit| {
                    offsets.borrow_mut().push(offset);
                    let page = pages[(offset / limit) as usize].clone();
                    async move { Ok::<_, ExportError>(page) }
                },
                |item: &u32| *item == 60,
            )
            .await
            .unwrap();

        assert_eq!(found, Some(60));
        assert_eq!(*offsets.borrow(), vec![0, 50]);
    }

    #[tokio::test]
    async fn test_find_first_respects_page_budget() {
        let paginator = Paginator::new(2, 3);
        let found = paginator
            .find_first(
                "test",
                |_, _| async {
                    Ok::<_, ExportError>(Page {
                        items: vec![1u32, 2],
                        total: 100,
                    })
                },
                |item: &u32| *item == 3,
            )
            .await
            .unwrap();

        assert_eq!(found, None);
    }
}
