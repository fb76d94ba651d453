//! Main client API for the video search service
//!
//! Builds request parameters for the five query kinds, sends them through a
//! [`Transport`] and hands the parsed page to a [`ResultCursor`].

use log::warn;

use crate::cursor::ResultCursor;
use crate::error::Result;
use crate::parser::parse_response;
use crate::transport::{ClientConfig, HttpTransport, Transport};
use crate::types::{ApiError, Facet, Page, QueryParameters, RelatedOptions, VideoOptions};
use crate::url::build_request_path;

/// Main client API for the video search service
///
/// Query methods never fail: transport and parse failures come back as an
/// error cursor carrying [`crate::INTERNAL_ERROR_CODE`], remote errors as an
/// error cursor carrying the remote code. Check [`ResultCursor::is_error`].
pub struct VideoClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl VideoClient<HttpTransport> {
    /// Create a new client over HTTP
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> VideoClient<T> {
    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search for videos
    ///
    /// The returned cursor pages through further results on demand.
    ///
    /// # Example
    /// ```no_run
    /// # fn example() -> vidsearch_core::Result<()> {
    /// use vidsearch_core::{ClientConfig, VideoClient, VideoOptions};
    /// let client = VideoClient::new(ClientConfig::new("my-app-id"))?;
    /// let mut cursor = client.get_videos("doctor who", VideoOptions::default());
    /// if let Some(error) = cursor.error() {
    ///     eprintln!("{}: {}", error.code, error.text);
    /// }
    /// for video in cursor.iterate().take(25) {
    ///     println!("{:?}", video.get("title"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn get_videos(&self, query: &str, options: VideoOptions) -> ResultCursor<'_, T> {
        self.fetch(QueryParameters::videos(query, options))
    }

    /// Tags related to a query
    pub fn get_related_tags(&self, query: &str, options: RelatedOptions) -> ResultCursor<'_, T> {
        self.get_related(Facet::Tag, query, options)
    }

    /// Channels related to a query
    pub fn get_related_channels(
        &self,
        query: &str,
        options: RelatedOptions,
    ) -> ResultCursor<'_, T> {
        self.get_related(Facet::Channel, query, options)
    }

    /// Categories related to a query
    pub fn get_related_categories(
        &self,
        query: &str,
        options: RelatedOptions,
    ) -> ResultCursor<'_, T> {
        self.get_related(Facet::Category, query, options)
    }

    /// Users related to a query
    pub fn get_related_users(&self, query: &str, options: RelatedOptions) -> ResultCursor<'_, T> {
        self.get_related(Facet::User, query, options)
    }

    /// Related-items call for any facet
    ///
    /// Only the facet's mapping is filled in; the cursor holds no videos.
    pub fn get_related(
        &self,
        facet: Facet,
        query: &str,
        options: RelatedOptions,
    ) -> ResultCursor<'_, T> {
        self.fetch(QueryParameters::related(facet, query, options))
    }

    /// Issue a request and wrap the page in a cursor
    pub fn fetch(&self, params: QueryParameters) -> ResultCursor<'_, T> {
        let page = self.fetch_page(&params);
        ResultCursor::new(self, params, page)
    }

    /// Issue a request and parse the response into a single page
    ///
    /// Never fails; see [`VideoClient`].
    pub fn fetch_page(&self, params: &QueryParameters) -> Page {
        let path = build_request_path(&self.config.path, &params.to_pairs(&self.config.app_id));

        let result = self
            .transport
            .get(&self.config.host, self.config.port, &path)
            .and_then(|body| parse_response(&body, params.method));

        match result {
            Ok(page) => {
                if let Some(error) = &page.error {
                    warn!(
                        "{} returned error {}: {}",
                        params.method.name(),
                        error.code,
                        error.text
                    );
                }
                page
            }
            Err(e) => {
                warn!("{} failed: {}", params.method.name(), e);
                Page::failed(ApiError::internal(&e))
            }
        }
    }
}
