//! This modules defines the common functionality for fetching every page of a
//! paged list endpoint.

use crate::Error;

/// The first page of every list endpoint.
pub const FIRST_PAGE: u64 = 1;

/// One page of a collection along with the paging metadata the API reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The number of items in the whole collection.
    pub total: u64,
    /// The page size the API actually used. Zero if the API did not say.
    pub limit: u64,
    /// The items on this page.
    pub items: Vec<T>,
}

/// Something that can serve a collection one page at a time.
pub trait PageSource<T> {
    /// Fetch page number `page` (1-based) holding up to `limit` items.
    fn fetch_page(&self, page: u64, limit: u64)
    -> impl Future<Output = Result<Page<T>, Error>> + Send;
}

/// The number of pages needed to hold `total` items, `limit` at a time.
///
/// Always at least one, since the first page is fetched even for an empty
/// collection.
pub fn page_count(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 1;
    }

    total.div_ceil(limit).max(1)
}

/// Fetch every page of `source` and concatenate the items in page order.
///
/// See [fetch_all_while] for details.
pub async fn fetch_all<T, S>(source: &S, limit: u64) -> Result<Vec<T>, Error>
where
    S: PageSource<T>,
{
    fetch_all_while(source, limit, || true).await
}

/// Fetch every page of `source` while `is_active` returns true.
///
/// The first page is fetched to learn the collection size and the page size
/// the API settled on, then the remaining pages are fetched one after another.
/// `is_active` is checked after each page request settles, whether it succeeded
/// or failed; once it returns false the items fetched so far are dropped and
/// [Error::Cancelled] is returned.
///
/// # Errors
/// The first error from `source` aborts the whole fetch and is returned as is,
/// unless the fetch is no longer active.
pub async fn fetch_all_while<T, S, F>(
    source: &S,
    limit: u64,
    is_active: F,
) -> Result<Vec<T>, Error>
where
    S: PageSource<T>,
    F: Fn() -> bool,
{
    let first = settle(source.fetch_page(FIRST_PAGE, limit).await, &is_active)?;

    let limit = if first.limit == 0 { limit } else { first.limit };
    let total_pages = page_count(first.total, limit);
    tracing::debug!(
        "Fetched page {FIRST_PAGE} of {total_pages} ({} of {} items)",
        first.items.len(),
        first.total
    );

    let mut items = first.items;
    for page in (FIRST_PAGE + 1)..=total_pages {
        let next = settle(source.fetch_page(page, limit).await, &is_active)?;

        tracing::debug!("Fetched page {page} of {total_pages}");
        items.extend(next.items);
    }

    Ok(items)
}

fn settle<T, F>(result: Result<Page<T>, Error>, is_active: &F) -> Result<Page<T>, Error>
where
    F: Fn() -> bool,
{
    if !is_active() {
        return Err(Error::Cancelled);
    }

    result
}

#[cfg(test)]
pub(crate) mod test_utils {
    //! An in-memory [PageSource] that records the requests made to it.

    use std::sync::Mutex;

    use crate::{
        Error,
        pagination::{Page, PageSource},
    };

    pub struct VecSource<T> {
        items: Vec<T>,
        reported_limit: Option<u64>,
        fail_on_page: Option<u64>,
        pub requests: Mutex<Vec<(u64, u64)>>,
    }

    impl<T: Clone + Send + Sync> VecSource<T> {
        pub fn new(items: Vec<T>) -> Self {
            Self {
                items,
                reported_limit: None,
                fail_on_page: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Serve pages of this size regardless of the requested limit.
        pub fn with_reported_limit(mut self, limit: u64) -> Self {
            self.reported_limit = Some(limit);
            self
        }

        pub fn failing_on_page(mut self, page: u64) -> Self {
            self.fail_on_page = Some(page);
            self
        }

        pub fn requested_pages(&self) -> Vec<u64> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(page, _)| *page)
                .collect()
        }
    }

    impl<T: Clone + Send + Sync> PageSource<T> for VecSource<T> {
        async fn fetch_page(&self, page: u64, limit: u64) -> Result<Page<T>, Error> {
            self.requests.lock().unwrap().push((page, limit));

            if self.fail_on_page == Some(page) {
                return Err(Error::Network("connection reset".to_owned()));
            }

            let limit = self.reported_limit.unwrap_or(limit);
            let start = ((page - 1) * limit) as usize;
            let items = self
                .items
                .iter()
                .skip(start)
                .take(limit as usize)
                .cloned()
                .collect();

            Ok(Page {
                total: self.items.len() as u64,
                limit: self.reported_limit.unwrap_or(0),
                items,
            })
        }
    }
}
