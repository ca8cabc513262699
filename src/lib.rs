pub mod app;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod logging;
pub mod progress;
pub mod scanner;
pub mod storage;
pub mod store;
pub mod view;
