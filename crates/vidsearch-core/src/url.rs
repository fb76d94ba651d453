//! URL helper functions for the video search API
//!
//! Provides functions for building the query string, the request path and
//! the full request URL.

/// Builds a query string from ordered key/value pairs
///
/// Keys and values are percent-encoded and joined with `&`.
///
/// # Example
/// ```
/// use vidsearch_core::url::build_query_string;
/// let qs = build_query_string(&[("method", "getVideos".to_string()), ("query", "doctor who".to_string())]);
/// assert_eq!(qs, "method=getVideos&query=doctor%20who");
/// ```
pub fn build_query_string(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the path+query part of a request
///
/// # Example
/// ```
/// use vidsearch_core::url::build_request_path;
/// let path = build_request_path("/apiv3", &[("start", "10".to_string())]);
/// assert_eq!(path, "/apiv3?start=10");
/// ```
pub fn build_request_path(path: &str, pairs: &[(&str, String)]) -> String {
    format!("{}?{}", path, build_query_string(pairs))
}

/// Builds the absolute URL for a host, port and path+query
///
/// Port 443 selects `https`, any other port `http`. Default ports are
/// left out of the URL.
///
/// # Example
/// ```
/// use vidsearch_core::url::build_request_url;
/// assert_eq!(build_request_url("example.com", 80, "/apiv3?a=1"), "http://example.com/apiv3?a=1");
/// assert_eq!(build_request_url("127.0.0.1", 8080, "/x"), "http://127.0.0.1:8080/x");
/// ```
pub fn build_request_url(host: &str, port: u16, path_and_query: &str) -> String {
    match port {
        80 => format!("http://{}{}", host, path_and_query),
        443 => format!("https://{}{}", host, path_and_query),
        _ => format!("http://{}:{}{}", host, port, path_and_query),
    }
}
