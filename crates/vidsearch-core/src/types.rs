//! Core data types for the video search client
//!
//! Contains request parameters, the facet tag used by related-items calls,
//! and the parsed [`Page`] that backs every [`crate::ResultCursor`].

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::Serialize;

use crate::error::VidsearchError;

/// Error code used for failures that did not come from the remote service
/// (network errors, unparseable bodies). Remote codes are positive integers.
pub const INTERNAL_ERROR_CODE: &str = "-1";

/// Metadata of a single video, keyed by the XML element name
/// (e.g. `title`, `id`, `thumbnailUrl`). No fixed schema.
pub type VideoRecord = BTreeMap<String, String>;

/// Facet values and how many results carry them
pub type NamedCounts = HashMap<String, u64>;

/// The four facets the service can aggregate results by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Facet {
    Tag,
    Channel,
    Category,
    User,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Tag, Facet::Channel, Facet::Category, Facet::User];

    /// Plural name as used in method names (`getRelatedTags`)
    pub fn plural(self) -> &'static str {
        match self {
            Facet::Tag => "Tags",
            Facet::Channel => "Channels",
            Facet::Category => "Categories",
            Facet::User => "Users",
        }
    }

    /// Item element name inside the facet's set (`<Tag>`)
    pub fn element(self) -> &'static str {
        match self {
            Facet::Tag => "Tag",
            Facet::Channel => "Channel",
            Facet::Category => "Category",
            Facet::User => "User",
        }
    }

    /// Looks a facet up by its plural name
    pub fn from_plural(plural: &str) -> Option<Facet> {
        let singular = singularize(plural);
        Facet::ALL.into_iter().find(|f| f.element() == singular)
    }
}

/// Turns a plural facet name into the item element name
///
/// "Categories" is special-cased; everything else drops its last character.
///
/// # Example
/// ```
/// use vidsearch_core::singularize;
/// assert_eq!(singularize("Tags"), "Tag");
/// assert_eq!(singularize("Categories"), "Category");
/// ```
pub fn singularize(plural: &str) -> String {
    if plural == "Categories" {
        return "Category".to_string();
    }
    let mut chars = plural.chars();
    chars.next_back();
    chars.as_str().to_string()
}

/// Remote method invoked by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetVideos,
    GetRelated(Facet),
}

impl Method {
    /// Value sent as the `method` request parameter
    pub fn name(self) -> String {
        match self {
            Method::GetVideos => "getVideos".to_string(),
            Method::GetRelated(facet) => format!("getRelated{}", facet.plural()),
        }
    }
}

/// Optional knobs for a `getVideos` call
///
/// Defaults mirror the service's own: ten results per page and per facet,
/// no related items, no adult content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOptions {
    pub results: u32,
    pub start: u32,
    pub show_related_items: bool,
    pub tag_results: u32,
    pub channel_results: u32,
    pub category_results: u32,
    pub user_results: u32,
    pub show_adult: bool,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            results: 10,
            start: 0,
            show_related_items: false,
            tag_results: 10,
            channel_results: 10,
            category_results: 10,
            user_results: 10,
            show_adult: false,
        }
    }
}

/// Paging for a related-items call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedOptions {
    pub results: u32,
    pub start: u32,
}

impl Default for RelatedOptions {
    fn default() -> Self {
        Self {
            results: 10,
            start: 0,
        }
    }
}

/// Parameters of one request
///
/// Fixed once sent, except `start`, which the cursor advances to page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    pub method: Method,
    pub query: String,
    pub start: u32,
    pub results: u32,
    /// Only sent for `getVideos`
    pub video: Option<VideoOptions>,
}

impl QueryParameters {
    pub fn videos(query: &str, options: VideoOptions) -> Self {
        Self {
            method: Method::GetVideos,
            query: query.to_string(),
            start: options.start,
            results: options.results,
            video: Some(options),
        }
    }

    pub fn related(facet: Facet, query: &str, options: RelatedOptions) -> Self {
        Self {
            method: Method::GetRelated(facet),
            query: query.to_string(),
            start: options.start,
            results: options.results,
            video: None,
        }
    }

    /// Ordered key/value pairs as transmitted, `appid` included
    pub fn to_pairs(&self, app_id: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("method", self.method.name()),
            ("query", self.query.clone()),
            ("appid", app_id.to_string()),
            ("results", self.results.to_string()),
            ("start", self.start.to_string()),
        ];

        if let Some(video) = &self.video {
            pairs.extend([
                ("showRelatedItems", flag(video.show_related_items)),
                ("tagResults", video.tag_results.to_string()),
                ("channelResults", video.channel_results.to_string()),
                ("categoryResults", video.category_results.to_string()),
                ("userResults", video.user_results.to_string()),
                ("showAdult", flag(video.show_adult)),
            ]);
        }

        pairs
    }
}

fn flag(on: bool) -> String {
    let value = if on { "1" } else { "0" };
    value.to_string()
}

/// Error carried by an error page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Remote `Code` attribute, or [`INTERNAL_ERROR_CODE`]
    pub code: String,
    pub text: String,
}

impl ApiError {
    /// Wraps a local failure under the synthetic code
    pub fn internal(error: &VidsearchError) -> Self {
        Self {
            code: INTERNAL_ERROR_CODE.to_string(),
            text: error.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.code == INTERNAL_ERROR_CODE
    }
}

/// One parsed response
///
/// An error page has `error` set and every other field left at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub method: Option<String>,
    pub query: Option<String>,
    pub sortby: Option<String>,
    pub suggestion: Option<String>,
    pub sphinx_query: Option<String>,
    pub sphinx_time: Option<String>,
    pub rss_url: Option<String>,
    pub title: Option<String>,

    pub first_result_position: u32,
    /// As declared by the service, which may disagree with `videos.len()`
    pub total_results_returned: u32,
    pub total_results_available: u32,

    /// Unconsumed videos, front first
    pub videos: VecDeque<VideoRecord>,
    pub channels: NamedCounts,
    pub tags: NamedCounts,
    pub categories: NamedCounts,
    pub users: NamedCounts,

    pub error: Option<ApiError>,
    /// Non-fatal data-shape problems found while parsing
    pub warnings: Vec<String>,
}

impl Page {
    pub fn failed(error: ApiError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// True when the page carries a non-empty error code
    pub fn is_error(&self) -> bool {
        self.error.as_ref().is_some_and(|e| !e.code.is_empty())
    }

    /// Mapping for the given facet
    pub fn facet(&self, facet: Facet) -> &NamedCounts {
        match facet {
            Facet::Tag => &self.tags,
            Facet::Channel => &self.channels,
            Facet::Category => &self.categories,
            Facet::User => &self.users,
        }
    }

    pub(crate) fn facet_mut(&mut self, facet: Facet) -> &mut NamedCounts {
        match facet {
            Facet::Tag => &mut self.tags,
            Facet::Channel => &mut self.channels,
            Facet::Category => &mut self.categories,
            Facet::User => &mut self.users,
        }
    }
}
