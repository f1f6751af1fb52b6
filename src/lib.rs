#![forbid(unsafe_code)]

pub mod coercion;
pub mod config;
pub mod datamodel;
pub mod http;
pub mod importers;
pub mod infer;
pub mod pipeline;
pub mod storage;
pub mod wizard;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
