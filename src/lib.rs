//! InNews - a small news portal
//!
//! Reads the aggregator's RSS feeds on every request and renders them as a
//! three-column grid, with trending, category and search views.

pub mod config;
pub mod fetcher;
pub mod grid;
pub mod navigation;
pub mod parser;
pub mod routes;
