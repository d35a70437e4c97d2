//! Object-storage source
//!
//! Lists a bucket, filters to `.json` objects and fetches each one as a
//! parsed JSON payload.

mod bucket;

pub use bucket::{filter_json_keys, BucketSource};
