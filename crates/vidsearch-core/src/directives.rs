//! Query directives understood by the search service
//!
//! The client does not interpret these; they are embedded in the query text
//! by callers (e.g. `"sort:mostRecent doctor who"`). The tables exist for
//! documentation and caller-side validation.

/// Result ordering directives
pub static SORTERS: &[&str] = &[
    "sort:vrank",
    "sort:mostPopular",
    "sort:mostPopularNow",
    "sort:mostPopularThisWeek",
    "sort:mostPopularThisMonth",
    "sort:mostRecent",
    "sort:topRated",
    "sort:topFavorites",
    "sort:mostDiscussed",
    "sort:mostLinked",
];

/// Result filtering directives
pub static FILTERS: &[&str] = &[
    "type:free",
    "type:reg",
    "type:sub",
    "type:pay",
    "format:win",
    "format:real",
    "format:qt",
    "format:flash",
    "quality:poor",
    "quality:fair",
    "quality:good",
    "quality:excellent",
];

/// Field-scoping modifiers, followed by a value (`channel:BBC`)
pub static MODIFIERS: &[&str] = &[
    "title:",
    "description:",
    "tag:",
    "channel:",
    "category:",
    "user:",
    "artist:",
    "album:",
    "show:",
    "season:",
    "episode:",
    "runtime:",
    "date:",
    "id:",
];

/// Whether a single query term is a known sorter, filter or modifier
///
/// # Example
/// ```
/// use vidsearch_core::directives::is_known_directive;
/// assert!(is_known_directive("sort:mostRecent"));
/// assert!(is_known_directive("channel:BBC"));
/// assert!(!is_known_directive("doctor"));
/// ```
pub fn is_known_directive(term: &str) -> bool {
    SORTERS.iter().chain(FILTERS).any(|d| *d == term)
        || MODIFIERS.iter().any(|m| term.starts_with(m))
}
