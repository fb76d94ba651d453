//! XML parsers for the video search API
//!
//! Every method answers with the same `<Response>` document shape, so one
//! parser handles them all.

pub mod response;

pub use response::parse_response;
