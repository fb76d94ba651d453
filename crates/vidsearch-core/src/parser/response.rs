//! Response parser for the video search API
//!
//! Parses the XML body into an element tree and walks it with two lookups,
//! [`find`] (first element on a path) and [`find_all`] (every element on a
//! path), flattening what it finds into a [`Page`].
//!
//! ```text
//! <Response>
//!   <method/> <query/> <sortby/> <suggestion/> ...
//!   <VideoSet>
//!     <totalResultsReturned/> <firstResultPosition/> ...
//!     <Video> <title/> <id/> ... </Video>
//!   </VideoSet>
//!   <TagSet> <totalResultsReturned/> <Tag><name/><count/></Tag> </TagSet>
//!   ...
//! </Response>
//! ```
//!
//! An error response is `<Error Code="14">Access Denied</Error>`, either as
//! the root element or inside `<Response>`.

use log::warn;
use xmltree::{Element, XMLNode};

use crate::error::{Result, VidsearchError};
use crate::types::{ApiError, Facet, Method, NamedCounts, Page, VideoRecord};

const ROOT: &str = "Response";
const ERROR: &str = "Error";

/// First element matching a `/`-separated child path below `root`
pub fn find<'a>(root: &'a Element, path: &str) -> Option<&'a Element> {
    find_all(root, path).into_iter().next()
}

/// Every element matching a `/`-separated child path below `root`, in
/// document order
pub fn find_all<'a>(root: &'a Element, path: &str) -> Vec<&'a Element> {
    let mut current = vec![root];
    for step in path.split('/').filter(|s| !s.is_empty()) {
        current = current
            .into_iter()
            .flat_map(|e| e.children.iter().filter_map(XMLNode::as_element))
            .filter(|child| child.name == step)
            .collect();
    }
    current
}

/// All text below `element`, nested markup dropped, trimmed
fn text_of(element: &Element) -> String {
    fn collect(element: &Element, out: &mut String) {
        for node in &element.children {
            match node {
                XMLNode::Text(text) | XMLNode::CData(text) => out.push_str(text),
                XMLNode::Element(child) => collect(child, out),
                _ => {}
            }
        }
    }

    let mut out = String::new();
    collect(element, &mut out);
    out.trim().to_string()
}

fn text_at(root: &Element, path: &str) -> Option<String> {
    find(root, path).map(text_of)
}

fn api_error(element: &Element) -> ApiError {
    ApiError {
        code: element
            .attributes
            .get("Code")
            .map(|c| c.trim().to_string())
            .unwrap_or_default(),
        text: text_of(element),
    }
}

/// A `<Video>` as name → text pairs of its attributes and child elements
fn video_record(video: &Element) -> VideoRecord {
    let mut record: VideoRecord = video
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    for child in video.children.iter().filter_map(XMLNode::as_element) {
        record.insert(child.name.clone(), text_of(child));
    }
    record
}

/// Parses a response body into a [`Page`]
///
/// For `getVideos` the video list and all four facet mappings are
/// extracted; for a related-items method only that facet's mapping.
///
/// # Arguments
/// * `xml` - Raw response body
/// * `method` - Method the request was made with
///
/// # Returns
/// The parsed page. A remote `<Error>` yields an error page, not an `Err`.
///
/// # Errors
/// Returns `ParseError` if the body is not well-formed XML or its root is
/// neither `<Response>` nor `<Error>`
pub fn parse_response(xml: &str, method: Method) -> Result<Page> {
    let root = Element::parse(xml.as_bytes())?;

    if root.name == ERROR {
        return Ok(Page::failed(api_error(&root)));
    }
    if root.name != ROOT {
        return Err(VidsearchError::ParseError(format!(
            "unexpected root element <{}>",
            root.name
        )));
    }
    if let Some(error) = find(&root, ERROR) {
        return Ok(Page::failed(api_error(error)));
    }

    let mut page = Page {
        method: text_at(&root, "method"),
        query: text_at(&root, "query"),
        sortby: text_at(&root, "sortby"),
        suggestion: text_at(&root, "suggestion"),
        sphinx_query: text_at(&root, "sphinxQuery"),
        sphinx_time: text_at(&root, "sphinxTime"),
        rss_url: text_at(&root, "VideoSet/rssUrl").or_else(|| text_at(&root, "rssUrl")),
        title: text_at(&root, "VideoSet/title").or_else(|| text_at(&root, "title")),
        ..Page::default()
    };

    let first = text_at(&root, "VideoSet/firstResultPosition")
        .or_else(|| text_at(&root, "firstResultPosition"));
    page.first_result_position =
        parse_count("firstResultPosition", first.as_deref(), &mut page.warnings);

    let available = text_at(&root, "VideoSet/totalResultsAvailable")
        .or_else(|| text_at(&root, "totalResultsAvailable"));
    page.total_results_available =
        parse_count("totalResultsAvailable", available.as_deref(), &mut page.warnings);

    match method {
        Method::GetVideos => {
            if let Some(set) = find(&root, "VideoSet") {
                let videos = find_all(set, "Video");
                page.total_results_returned = declared_count(
                    "Video",
                    text_at(set, "totalResultsReturned").as_deref(),
                    videos.len(),
                    &mut page.warnings,
                );
                page.videos = videos.into_iter().map(video_record).collect();
            }
            for facet in Facet::ALL {
                if let Some(set) = find(&root, &set_name(facet)) {
                    let counts = collect_facet(set, facet, &mut page.warnings);
                    *page.facet_mut(facet) = counts;
                }
            }
        }
        Method::GetRelated(facet) => {
            if let Some(set) = find(&root, &set_name(facet)) {
                page.total_results_returned = declared_count(
                    facet.element(),
                    text_at(set, "totalResultsReturned").as_deref(),
                    find_all(set, facet.element()).len(),
                    &mut page.warnings,
                );
                let counts = collect_facet(set, facet, &mut page.warnings);
                *page.facet_mut(facet) = counts;
            }
        }
    }

    Ok(page)
}

fn set_name(facet: Facet) -> String {
    format!("{}Set", facet.element())
}

/// Flattens a facet set into a name → count mapping
///
/// Items with a missing name or an unparseable count are skipped.
fn collect_facet(set: &Element, facet: Facet, warnings: &mut Vec<String>) -> NamedCounts {
    let mut counts = NamedCounts::new();

    for item in find_all(set, facet.element()) {
        let Some(name) = text_at(item, "name").filter(|n| !n.is_empty()) else {
            record(warnings, format!("{} without a name skipped", facet.element()));
            continue;
        };
        let count = text_at(item, "count");
        match count.as_deref().map(str::parse::<u64>) {
            Some(Ok(value)) => {
                counts.insert(name, value);
            }
            _ => record(
                warnings,
                format!(
                    "{} {:?} has invalid count {:?}, skipped",
                    facet.element(),
                    name,
                    count
                ),
            ),
        }
    }

    counts
}

/// Resolves the declared `totalResultsReturned` of a set
///
/// A missing declaration falls back to the number of parsed items; a
/// declaration that disagrees with it is kept but recorded as a warning.
fn declared_count(
    element: &str,
    declared: Option<&str>,
    actual: usize,
    warnings: &mut Vec<String>,
) -> u32 {
    let Some(raw) = declared else {
        return u32::try_from(actual).unwrap_or(u32::MAX);
    };
    let declared = parse_count("totalResultsReturned", Some(raw), warnings);
    if usize::try_from(declared).map_or(true, |d| d != actual) {
        record(
            warnings,
            format!(
                "totalResultsReturned is {} but {} {} elements were parsed",
                declared, actual, element
            ),
        );
    }
    declared
}

fn parse_count(field: &str, value: Option<&str>, warnings: &mut Vec<String>) -> u32 {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };
    raw.parse().unwrap_or_else(|_| {
        record(warnings, format!("{} {:?} is not a count", field, raw));
        0
    })
}

fn record(warnings: &mut Vec<String>, message: String) {
    warn!("{}", message);
    warnings.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VidsearchError;

    const VIDEOS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
  <method>getVideos</method>
  <query>doctor who</query>
  <sortby>relevance</sortby>
  <suggestion></suggestion>
  <sphinxQuery>doctor who</sphinxQuery>
  <VideoSet>
    <totalResultsAvailable>1234</totalResultsAvailable>
    <totalResultsReturned>2</totalResultsReturned>
    <firstResultPosition>0</firstResultPosition>
    <rssUrl>http://xml.truveo.com/rss?query=doctor%20who</rssUrl>
    <title>Videos matching doctor who</title>
    <Video>
      <id>1</id>
      <title>Blink</title>
      <thumbnailUrl>http://example.com/1.jpg</thumbnailUrl>
    </Video>
    <Video>
      <id>2</id>
      <title>Midnight</title>
    </Video>
  </VideoSet>
  <ChannelSet>
    <totalResultsReturned>2</totalResultsReturned>
    <Channel><name>BBC</name><count>40</count></Channel>
    <Channel><name>YouTube</name><count>7</count></Channel>
  </ChannelSet>
  <TagSet>
    <totalResultsReturned>1</totalResultsReturned>
    <Tag><name>scifi</name><count>12</count></Tag>
  </TagSet>
</Response>"#;

    #[test]
    fn test_parse_videos_response() {
        let page = parse_response(VIDEOS_XML, Method::GetVideos).unwrap();

        assert!(!page.is_error());
        assert_eq!(page.method.as_deref(), Some("getVideos"));
        assert_eq!(page.query.as_deref(), Some("doctor who"));
        assert_eq!(page.sortby.as_deref(), Some("relevance"));
        assert_eq!(page.sphinx_query.as_deref(), Some("doctor who"));
        assert_eq!(page.title.as_deref(), Some("Videos matching doctor who"));
        assert_eq!(page.total_results_available, 1234);
        assert_eq!(page.total_results_returned, 2);
        assert_eq!(page.first_result_position, 0);
        assert!(page.warnings.is_empty());

        assert_eq!(page.videos.len(), 2);
        assert_eq!(page.videos[0]["title"], "Blink");
        assert_eq!(page.videos[0]["thumbnailUrl"], "http://example.com/1.jpg");
        assert_eq!(page.videos[1]["id"], "2");
        assert!(!page.videos[1].contains_key("thumbnailUrl"));

        assert_eq!(page.channels.len(), 2);
        assert_eq!(page.channels["BBC"], 40);
        assert_eq!(page.tags["scifi"], 12);
        assert!(page.categories.is_empty());
        assert!(page.users.is_empty());
    }

    #[test]
    fn test_parse_count_mismatch_is_a_warning() {
        let xml = r#"<Response>
  <VideoSet>
    <totalResultsReturned>3</totalResultsReturned>
    <firstResultPosition>10</firstResultPosition>
    <Video><id>a</id></Video>
  </VideoSet>
</Response>"#;

        let page = parse_response(xml, Method::GetVideos).unwrap();
        assert!(!page.is_error());
        assert_eq!(page.videos.len(), 1);
        assert_eq!(page.total_results_returned, 3);
        assert_eq!(page.first_result_position, 10);
        assert_eq!(page.warnings.len(), 1);
        assert!(page.warnings[0].contains("totalResultsReturned is 3"));
    }

    #[test]
    fn test_parse_missing_declared_count_uses_actual() {
        let xml = r#"<Response><VideoSet><Video><id>a</id></Video><Video><id>b</id></Video></VideoSet></Response>"#;
        let page = parse_response(xml, Method::GetVideos).unwrap();
        assert_eq!(page.total_results_returned, 2);
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_parse_empty_video_set() {
        let xml = r#"<Response><VideoSet><totalResultsReturned>0</totalResultsReturned></VideoSet></Response>"#;
        let page = parse_response(xml, Method::GetVideos).unwrap();
        assert!(page.videos.is_empty());
        assert_eq!(page.total_results_returned, 0);
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_parse_root_error() {
        let xml = r#"<Error Code='14'>Access Denied</Error>"#;
        let page = parse_response(xml, Method::GetVideos).unwrap();
        let error = page.error.as_ref().expect("error page");
        assert_eq!(error.code, "14");
        assert_eq!(error.text, "Access Denied");
        assert!(page.videos.is_empty());
    }

    #[test]
    fn test_parse_nested_error() {
        let xml = r#"<Response><Error Code="7">Invalid method</Error></Response>"#;
        let page = parse_response(xml, Method::GetVideos).unwrap();
        let error = page.error.as_ref().expect("error page");
        assert_eq!(error.code, "7");
        assert_eq!(error.text, "Invalid method");
        assert!(page.method.is_none());
    }

    #[test]
    fn test_parse_malformed_body() {
        let result = parse_response("this is <<< not xml", Method::GetVideos);
        assert!(matches!(result, Err(VidsearchError::ParseError(_))));
    }

    #[test]
    fn test_parse_empty_body() {
        let result = parse_response("", Method::GetVideos);
        assert!(matches!(result, Err(VidsearchError::ParseError(_))));
    }

    #[test]
    fn test_parse_related_categories() {
        let xml = r#"<Response>
  <method>getRelatedCategories</method>
  <CategorySet>
    <totalResultsReturned>2</totalResultsReturned>
    <Category><name>Music</name><count>5</count></Category>
    <Category><name>News</name><count>3</count></Category>
  </CategorySet>
</Response>"#;

        let page = parse_response(xml, Method::GetRelated(Facet::Category)).unwrap();
        assert_eq!(page.categories.len(), 2);
        assert_eq!(page.categories["Music"], 5);
        assert_eq!(page.total_results_returned, 2);
        assert!(page.videos.is_empty());
        assert!(page.tags.is_empty());
    }

    #[test]
    fn test_parse_related_ignores_other_sets() {
        let page = parse_response(VIDEOS_XML, Method::GetRelated(Facet::Tag)).unwrap();
        assert_eq!(page.tags["scifi"], 12);
        assert!(page.channels.is_empty());
        assert!(page.videos.is_empty());
        assert_eq!(page.total_results_returned, 1);
    }

    #[test]
    fn test_parse_skips_invalid_facet_items() {
        let xml = r#"<Response>
  <UserSet>
    <totalResultsReturned>3</totalResultsReturned>
    <User><name>alice</name><count>9</count></User>
    <User><name>bob</name><count>many</count></User>
    <User><count>1</count></User>
  </UserSet>
</Response>"#;

        let page = parse_response(xml, Method::GetRelated(Facet::User)).unwrap();
        assert_eq!(page.users.len(), 1);
        assert_eq!(page.users["alice"], 9);
        assert_eq!(page.warnings.len(), 2);
    }

    #[test]
    fn test_parse_invalid_position_defaults_to_zero() {
        let xml = r#"<Response><VideoSet><firstResultPosition>abc</firstResultPosition></VideoSet></Response>"#;
        let page = parse_response(xml, Method::GetVideos).unwrap();
        assert_eq!(page.first_result_position, 0);
        assert_eq!(page.warnings.len(), 1);
    }

    #[test]
    fn test_parse_video_with_nested_markup() {
        let xml = r#"<Response>
  <VideoSet>
    <totalResultsReturned>2</totalResultsReturned>
    <Video kind="clip">
      <id>1</id>
      <tags><tag>a</tag><tag>b</tag></tags>
      <description><p>Some text</p></description>
    </Video>
    <Video><id>2</id><thumbnail url="http://example.com/2.jpg"/></Video>
  </VideoSet>
</Response>"#;

        let page = parse_response(xml, Method::GetVideos).unwrap();
        assert!(!page.is_error());
        assert_eq!(page.videos.len(), 2);
        assert!(page.warnings.is_empty());
        assert_eq!(page.videos[0]["kind"], "clip");
        assert_eq!(page.videos[0]["tags"], "ab");
        assert_eq!(page.videos[0]["description"], "Some text");
        assert_eq!(page.videos[1]["thumbnail"], "");
    }

    #[test]
    fn test_parse_non_adjacent_items() {
        let xml = r#"<Response>
  <VideoSet>
    <Video><id>1</id></Video>
    <totalResultsReturned>2</totalResultsReturned>
    <Video><id>2</id></Video>
  </VideoSet>
  <TagSet>
    <Tag><name>a</name><count>1</count></Tag>
    <totalResultsReturned>2</totalResultsReturned>
    <Tag><name>b</name><count>2</count></Tag>
  </TagSet>
</Response>"#;

        let page = parse_response(xml, Method::GetVideos).unwrap();
        assert!(!page.is_error());
        assert_eq!(page.videos.len(), 2);
        assert_eq!(page.videos[1]["id"], "2");
        assert_eq!(page.total_results_returned, 2);
        assert_eq!(page.tags.len(), 2);
        assert_eq!(page.tags["b"], 2);

        let related = parse_response(xml, Method::GetRelated(Facet::Tag)).unwrap();
        assert_eq!(related.tags.len(), 2);
        assert!(related.warnings.is_empty());
    }

    #[test]
    fn test_parse_unexpected_root() {
        let result = parse_response("<html><body>hi</body></html>", Method::GetVideos);
        match result {
            Err(VidsearchError::ParseError(msg)) => assert!(msg.contains("<html>")),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_find_all_follows_paths() {
        let root = Element::parse(VIDEOS_XML.as_bytes()).unwrap();
        assert_eq!(find_all(&root, "VideoSet/Video").len(), 2);
        assert_eq!(find_all(&root, "ChannelSet/Channel/name").len(), 2);
        assert!(find(&root, "UserSet/User").is_none());
        assert_eq!(text_at(&root, "VideoSet/Video/title").as_deref(), Some("Blink"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_response(VIDEOS_XML, Method::GetRelated(Facet::Channel)).unwrap();
        let second = parse_response(VIDEOS_XML, Method::GetRelated(Facet::Channel)).unwrap();
        assert_eq!(first.channels, second.channels);
    }
}
