//! End-to-end readers: credentials, lookup, range read and normalization
//! for each backend.

pub mod google;
pub mod microsoft;
