//! The restartable, lazily fetching feed iterator.

use serde_json::Value;

use crate::clients::{ClientError, ResponseHeaders};
use crate::resources::RequestOptions;

/// One page of a feed: the items in server order plus the response headers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedPage {
    /// The resource bodies of the page.
    pub items: Vec<Value>,
    /// The response headers, including the continuation token.
    pub headers: ResponseHeaders,
}

impl FeedPage {
    /// Returns the continuation token for the next page, if any.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.headers.continuation()
    }
}

/// A source of feed pages.
///
/// `options.continuation` carries the token of the page to fetch; `None`
/// asks for the first page.
#[allow(async_fn_in_trait)]
pub trait FeedSource {
    /// Fetches one page.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying request.
    async fn fetch(&mut self, options: &RequestOptions) -> Result<FeedPage, ClientError>;
}

/// Lifecycle of a [`QueryIterator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IteratorState {
    /// Nothing fetched since construction or the last reset.
    #[default]
    Start,
    /// At least one page fetched and the feed may continue.
    InProgress,
    /// The feed is exhausted or a fetch failed.
    Ended,
}

/// Iterates a paginated list or query feed.
///
/// Pages are fetched on demand through a [`FeedSource`]. The iterator keeps
/// the current page, a cursor into it and the continuation token of the next
/// page. Items can be consumed one at a time ([`next_item`](Self::next_item)),
/// pushed to a callback ([`for_each`](Self::for_each)), collected
/// ([`to_array`](Self::to_array)) or fetched page by page
/// ([`execute_next`](Self::execute_next)).
///
/// Fetch errors end the iterator and are returned once; there is no retry.
///
/// # Example
///
/// ```rust,ignore
/// let mut iterator = client.query_documents(collection_link, "SELECT * FROM root r", options);
///
/// while let Some(document) = iterator.next_item().await? {
///     println!("{document}");
/// }
/// ```
#[derive(Debug)]
pub struct QueryIterator<S> {
    source: S,
    options: RequestOptions,
    resources: Vec<Value>,
    current: usize,
    continuation: Option<String>,
    state: IteratorState,
}

impl<S: FeedSource> QueryIterator<S> {
    /// Creates an iterator over `source`.
    ///
    /// A continuation token already present in `options` is ignored: every
    /// traversal starts at the first page.
    #[must_use]
    pub fn new(source: S, mut options: RequestOptions) -> Self {
        options.continuation = None;
        Self {
            source,
            options,
            resources: Vec::new(),
            current: 0,
            continuation: None,
            state: IteratorState::Start,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> IteratorState {
        self.state
    }

    /// Returns the continuation token of the next page, if any.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.continuation.as_deref()
    }

    /// Returns the feed source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the next unread item of the current page without consuming it.
    #[must_use]
    pub fn current(&self) -> Option<&Value> {
        self.resources.get(self.current)
    }

    /// Returns `true` if more items may be available.
    ///
    /// That is the case before the first fetch, while a continuation token is
    /// held, or while the current page has unread items.
    #[must_use]
    pub fn has_more_results(&self) -> bool {
        self.state == IteratorState::Start
            || self.continuation.is_some()
            || self.current < self.resources.len()
    }

    /// Returns the iterator to its initial state.
    ///
    /// The page buffer, cursor and continuation token are cleared; the next
    /// consumption starts a new traversal from the first page.
    pub fn reset(&mut self) {
        self.state = IteratorState::Start;
        self.resources.clear();
        self.current = 0;
        self.continuation = None;
    }

    /// Returns the next item, fetching pages as needed.
    ///
    /// Empty pages that carry a continuation token are skipped. Returns
    /// `Ok(None)` once the feed is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the iterator is then ended.
    pub async fn next_item(&mut self) -> Result<Option<Value>, ClientError> {
        loop {
            if let Some(item) = self.resources.get(self.current) {
                let item = item.clone();
                self.current += 1;
                return Ok(Some(item));
            }

            let can_fetch = match self.state {
                IteratorState::Start => true,
                IteratorState::InProgress => self.continuation.is_some(),
                IteratorState::Ended => false,
            };
            if !can_fetch {
                self.state = IteratorState::Ended;
                return Ok(None);
            }

            self.fetch_more().await?;

            if self.resources.is_empty() && self.continuation.is_none() {
                self.state = IteratorState::Ended;
                return Ok(None);
            }
        }
    }

    /// Delivers every item, in order, to `callback`.
    ///
    /// The traversal starts from the beginning (the iterator is reset unless
    /// it is in [`IteratorState::Start`]). Returning `false` from `callback`
    /// stops the traversal; no further pages are fetched.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error; items delivered before it stay delivered.
    pub async fn for_each<F>(&mut self, mut callback: F) -> Result<(), ClientError>
    where
        F: FnMut(Value) -> bool,
    {
        if self.state != IteratorState::Start {
            self.reset();
        }

        while self.state == IteratorState::Start || self.continuation.is_some() {
            self.fetch_more().await?;

            while self.current < self.resources.len() {
                let item = self.resources[self.current].clone();
                self.current += 1;
                if !callback(item) {
                    return Ok(());
                }
            }
        }

        self.state = IteratorState::Ended;
        Ok(())
    }

    /// Collects every item of the feed, across all pages, in fetch order.
    ///
    /// The traversal starts from the beginning (the iterator is reset unless
    /// it is in [`IteratorState::Start`]).
    ///
    /// # Errors
    ///
    /// Returns the first fetch error; no partial result is returned.
    pub async fn to_array(&mut self) -> Result<Vec<Value>, ClientError> {
        if self.state != IteratorState::Start {
            self.reset();
        }

        let mut items = Vec::new();
        while self.state == IteratorState::Start || self.continuation.is_some() {
            self.fetch_more().await?;
            items.extend(self.resources.iter().skip(self.current).cloned());
            self.current = self.resources.len();
        }

        self.state = IteratorState::Ended;
        Ok(items)
    }

    /// Fetches exactly the next page and returns it as-is.
    ///
    /// Only the continuation token advances; the page is not marked as
    /// consumed and remains readable through [`next_item`](Self::next_item).
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the iterator is then ended.
    pub async fn execute_next(&mut self) -> Result<FeedPage, ClientError> {
        let headers = self.fetch_more().await?;
        Ok(FeedPage {
            items: self.resources.clone(),
            headers,
        })
    }

    async fn fetch_more(&mut self) -> Result<ResponseHeaders, ClientError> {
        self.options.continuation.clone_from(&self.continuation);

        match self.source.fetch(&self.options).await {
            Ok(page) => {
                self.continuation = page.continuation().map(str::to_string);
                self.resources = page.items;
                self.current = 0;
                self.state = IteratorState::InProgress;
                Ok(page.headers)
            }
            Err(error) => {
                tracing::debug!(%error, "feed fetch failed; ending iterator");
                self.state = IteratorState::Ended;
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::RequestError;
    use serde_json::json;
    use std::collections::{HashMap, VecDeque};

    /// Serves pages keyed by the continuation token that requests them.
    #[derive(Debug, Default)]
    struct ScriptedFeed {
        pages: HashMap<Option<String>, (Vec<Value>, Option<String>)>,
        requested: Vec<Option<String>>,
        failures: VecDeque<Option<String>>,
    }

    impl ScriptedFeed {
        fn page(mut self, token: Option<&str>, items: Vec<Value>, next: Option<&str>) -> Self {
            self.pages.insert(
                token.map(String::from),
                (items, next.map(String::from)),
            );
            self
        }

        fn fail_on(mut self, token: Option<&str>) -> Self {
            self.failures.push_back(token.map(String::from));
            self
        }
    }

    impl FeedSource for ScriptedFeed {
        async fn fetch(&mut self, options: &RequestOptions) -> Result<FeedPage, ClientError> {
            let token = options.continuation.clone();
            self.requested.push(token.clone());

            if self.failures.front() == Some(&token) {
                self.failures.pop_front();
                return Err(RequestError::Response {
                    code: 500,
                    body: "boom".to_string(),
                }
                .into());
            }

            let (items, next) = self.pages.get(&token).cloned().unwrap_or_default();
            let mut headers = HashMap::new();
            if let Some(next) = next {
                headers.insert("x-ms-continuation".to_string(), next);
            }
            Ok(FeedPage {
                items,
                headers: ResponseHeaders::from(headers),
            })
        }
    }

    fn three_pages() -> ScriptedFeed {
        ScriptedFeed::default()
            .page(None, vec![json!(1), json!(2)], Some("t1"))
            .page(Some("t1"), vec![json!(3)], Some("t2"))
            .page(Some("t2"), vec![json!(4), json!(5)], None)
    }

    #[tokio::test]
    async fn test_to_array_collects_all_pages_in_order() {
        let mut iterator = QueryIterator::new(three_pages(), RequestOptions::default());
        let items = iterator.to_array().await.unwrap();

        assert_eq!(items, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
        assert_eq!(iterator.state(), IteratorState::Ended);
        assert!(!iterator.has_more_results());
        assert_eq!(
            iterator.source().requested,
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_reset_then_to_array_reproduces_sequence() {
        let mut iterator = QueryIterator::new(three_pages(), RequestOptions::default());
        let first = iterator.to_array().await.unwrap();

        iterator.reset();
        assert_eq!(iterator.next_item().await.unwrap(), Some(json!(1)));
        iterator.for_each(|_| true).await.unwrap();

        iterator.reset();
        let again = iterator.to_array().await.unwrap();
        assert_eq!(again, first);
    }

    #[tokio::test]
    async fn test_to_array_restarts_after_partial_consumption() {
        let mut iterator = QueryIterator::new(three_pages(), RequestOptions::default());
        assert_eq!(iterator.next_item().await.unwrap(), Some(json!(1)));

        let items = iterator.to_array().await.unwrap();
        assert_eq!(items.len(), 5);
    }

    #[tokio::test]
    async fn test_has_more_results_lifecycle() {
        let feed = ScriptedFeed::default().page(None, vec![json!("a")], None);
        let mut iterator = QueryIterator::new(feed, RequestOptions::default());

        assert_eq!(iterator.state(), IteratorState::Start);
        assert!(iterator.has_more_results());

        assert_eq!(iterator.next_item().await.unwrap(), Some(json!("a")));
        assert_eq!(iterator.state(), IteratorState::InProgress);
        assert!(!iterator.has_more_results());

        assert_eq!(iterator.next_item().await.unwrap(), None);
        assert_eq!(iterator.state(), IteratorState::Ended);
        assert!(!iterator.has_more_results());

        // Ended signals end-of-sequence without fetching.
        assert_eq!(iterator.next_item().await.unwrap(), None);
        assert_eq!(iterator.source().requested.len(), 1);
    }

    #[tokio::test]
    async fn test_for_each_stops_when_callback_returns_false() {
        let feed = ScriptedFeed::default()
            .page(None, vec![json!("a"), json!("b"), json!("c")], Some("t1"))
            .page(Some("t1"), vec![json!("d")], None);
        let mut iterator = QueryIterator::new(feed, RequestOptions::default());

        let mut seen = Vec::new();
        iterator
            .for_each(|item| {
                let keep_going = item != json!("b");
                seen.push(item);
                keep_going
            })
            .await
            .unwrap();

        assert_eq!(seen, vec![json!("a"), json!("b")]);
        assert_eq!(iterator.source().requested.len(), 1);
    }

    #[tokio::test]
    async fn test_for_each_visits_every_page() {
        let mut iterator = QueryIterator::new(three_pages(), RequestOptions::default());
        let mut count = 0;
        iterator
            .for_each(|_| {
                count += 1;
                true
            })
            .await
            .unwrap();
        assert_eq!(count, 5);
        assert_eq!(iterator.state(), IteratorState::Ended);
    }

    #[tokio::test]
    async fn test_next_item_skips_empty_page_with_continuation() {
        let feed = ScriptedFeed::default()
            .page(None, vec![], Some("tok1"))
            .page(Some("tok1"), vec![json!("x")], None);
        let mut iterator = QueryIterator::new(feed, RequestOptions::default());

        assert_eq!(iterator.next_item().await.unwrap(), Some(json!("x")));
        assert_eq!(iterator.next_item().await.unwrap(), None);
        assert_eq!(iterator.state(), IteratorState::Ended);
    }

    #[tokio::test]
    async fn test_next_item_on_empty_feed_ends() {
        let mut iterator = QueryIterator::new(ScriptedFeed::default(), RequestOptions::default());
        assert_eq!(iterator.next_item().await.unwrap(), None);
        assert_eq!(iterator.state(), IteratorState::Ended);
        assert!(!iterator.has_more_results());
    }

    #[tokio::test]
    async fn test_fetch_error_ends_iterator_without_retry() {
        let feed = three_pages().fail_on(Some("t1"));
        let mut iterator = QueryIterator::new(feed, RequestOptions::default());

        assert_eq!(iterator.next_item().await.unwrap(), Some(json!(1)));
        assert_eq!(iterator.next_item().await.unwrap(), Some(json!(2)));

        let error = iterator.next_item().await.unwrap_err();
        assert_eq!(error.status_code(), Some(500));
        assert_eq!(iterator.state(), IteratorState::Ended);

        // The stale continuation is kept but an ended iterator does not fetch.
        assert_eq!(iterator.next_item().await.unwrap(), None);
        assert_eq!(iterator.source().requested.len(), 2);
    }

    #[tokio::test]
    async fn test_to_array_propagates_error() {
        let feed = three_pages().fail_on(Some("t2"));
        let mut iterator = QueryIterator::new(feed, RequestOptions::default());

        assert!(iterator.to_array().await.is_err());
        assert_eq!(iterator.state(), IteratorState::Ended);

        // A reset starts over and the transient failure is gone.
        iterator.reset();
        assert_eq!(iterator.to_array().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_execute_next_returns_pages_and_advances_token() {
        let mut iterator = QueryIterator::new(three_pages(), RequestOptions::default());

        let page = iterator.execute_next().await.unwrap();
        assert_eq!(page.items, vec![json!(1), json!(2)]);
        assert_eq!(page.continuation(), Some("t1"));
        assert_eq!(iterator.continuation(), Some("t1"));
        assert_eq!(iterator.current(), Some(&json!(1)));

        let page = iterator.execute_next().await.unwrap();
        assert_eq!(page.items, vec![json!(3)]);

        let page = iterator.execute_next().await.unwrap();
        assert_eq!(page.items, vec![json!(4), json!(5)]);
        assert_eq!(page.continuation(), None);
        assert!(iterator.has_more_results());
    }

    #[tokio::test]
    async fn test_current_peeks_without_consuming() {
        let mut iterator = QueryIterator::new(three_pages(), RequestOptions::default());
        assert_eq!(iterator.current(), None);

        assert_eq!(iterator.next_item().await.unwrap(), Some(json!(1)));
        assert_eq!(iterator.current(), Some(&json!(2)));
        assert_eq!(iterator.next_item().await.unwrap(), Some(json!(2)));
        assert_eq!(iterator.current(), None);
    }

    #[tokio::test]
    async fn test_initial_continuation_option_is_ignored() {
        let options = RequestOptions::new().continuation("stale").max_item_count(2);
        let mut iterator = QueryIterator::new(three_pages(), options);
        assert_eq!(iterator.next_item().await.unwrap(), Some(json!(1)));
        assert_eq!(iterator.source().requested, vec![None]);
    }
}
