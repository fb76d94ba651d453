//! Lazy pagination over `getVideos` results
//!
//! A [`ResultCursor`] holds one page plus the parameters that produced it.
//! Once the buffered videos run out it asks the client for the next page and
//! replaces its own page in place, so references to the cursor stay valid
//! across pages.

use log::{debug, warn};

use crate::client::VideoClient;
use crate::transport::Transport;
use crate::types::{ApiError, Method, Page, QueryParameters, VideoRecord};

/// The service never returns results past this position
pub const MAX_RESULT_POSITION: u32 = 1000;

/// Where a cursor stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// At least one video is buffered
    HasBufferedItems,
    /// Buffer is empty but another page may be fetched
    BufferEmptyAwaitingFetch,
    /// No more videos will be produced
    Exhausted,
}

/// One page of results that fetches the following pages on demand
pub struct ResultCursor<'c, T: Transport> {
    client: &'c VideoClient<T>,
    params: QueryParameters,
    page: Page,
    pages_fetched: u32,
    exhausted: bool,
}

impl<'c, T: Transport> ResultCursor<'c, T> {
    pub(crate) fn new(client: &'c VideoClient<T>, params: QueryParameters, page: Page) -> Self {
        Self {
            client,
            params,
            page,
            pages_fetched: 0,
            exhausted: false,
        }
    }

    /// The current page
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Parameters of the most recent request, `start` included
    pub fn params(&self) -> &QueryParameters {
        &self.params
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.page.error.as_ref()
    }

    /// True when the current page carries a non-empty error code
    pub fn is_error(&self) -> bool {
        self.page.is_error()
    }

    /// Number of follow-up pages requested so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Start position of the page after the current one
    pub fn next_start(&self) -> u32 {
        self.page
            .first_result_position
            .saturating_add(self.page.total_results_returned)
    }

    pub fn state(&self) -> CursorState {
        if !self.page.videos.is_empty() {
            CursorState::HasBufferedItems
        } else if self.exhausted || !self.can_fetch_more() {
            CursorState::Exhausted
        } else {
            CursorState::BufferEmptyAwaitingFetch
        }
    }

    fn can_fetch_more(&self) -> bool {
        self.params.method == Method::GetVideos
            && !self.page.is_error()
            && self.next_start() < MAX_RESULT_POSITION
    }

    /// Next video, fetching one more page if the buffer is empty
    ///
    /// Returns `None` once the cursor is exhausted: the 1000th result was
    /// reached, a fetched page came back empty, or the cursor is not a
    /// `getVideos` cursor. A failed fetch leaves its error on the cursor.
    pub fn produce_next(&mut self) -> Option<VideoRecord> {
        if let Some(video) = self.page.videos.pop_front() {
            return Some(video);
        }

        if self.state() == CursorState::Exhausted {
            self.exhausted = true;
            return None;
        }

        let next_start = self.next_start();
        let stalled = self.pages_fetched > 0 && next_start <= self.params.start;
        if stalled {
            warn!(
                "page at start={} does not advance (next start {}), stopping",
                self.params.start, next_start
            );
            self.exhausted = true;
            return None;
        }

        debug!("fetching next page for {:?} at start={}", self.params.query, next_start);
        self.params.start = next_start;
        self.page = self.client.fetch_page(&self.params);
        self.pages_fetched += 1;

        let video = self.page.videos.pop_front();
        if video.is_none() {
            self.exhausted = true;
        }
        video
    }

    /// Lazy sequence of every remaining video across pages
    ///
    /// Ends where [`produce_next`](Self::produce_next) does; at most
    /// [`MAX_RESULT_POSITION`] results overall.
    pub fn iterate(&mut self) -> impl Iterator<Item = VideoRecord> + '_ {
        std::iter::from_fn(move || self.produce_next())
    }
}
