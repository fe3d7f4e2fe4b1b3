pub mod activation;
pub mod bundle_source;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod hotkeys;
pub mod logging;
pub mod merge;
pub mod model;
pub mod name_resolver;
pub mod ordering;
pub mod process_source;
pub mod query;
pub mod recency;
pub mod runtime;
pub mod search;
pub mod shell;
pub mod storage;
pub mod transport;
