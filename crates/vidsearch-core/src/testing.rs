//! Scripted transport for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::{Result, VidsearchError};
use crate::transport::Transport;

/// Replays canned bodies in order and records every requested path
///
/// Once the script runs out every request fails with `NotFound`.
pub(crate) struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<String>>>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new<'a>(bodies: impl IntoIterator<Item = &'a str>) -> Self {
        Self::from_results(bodies.into_iter().map(|b| Ok(b.to_string())))
    }

    pub(crate) fn from_results(results: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            responses: RefCell::new(results.into_iter().collect()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, _host: &str, _port: u16, path_and_query: &str) -> Result<String> {
        self.requests.borrow_mut().push(path_and_query.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(VidsearchError::NotFound(path_and_query.to_string())))
    }
}

/// A `getVideos` response page with the given position and video ids
pub(crate) fn video_page(first: u32, declared: u32, ids: &[&str]) -> String {
    let videos: String = ids
        .iter()
        .map(|id| format!("<Video><id>{}</id><title>Video {}</title></Video>", id, id))
        .collect();
    format!(
        "<Response><method>getVideos</method><VideoSet>\
         <totalResultsAvailable>5000</totalResultsAvailable>\
         <totalResultsReturned>{}</totalResultsReturned>\
         <firstResultPosition>{}</firstResultPosition>{}</VideoSet></Response>",
        declared, first, videos
    )
}
