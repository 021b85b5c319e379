//! Flight search server.
//!
//! Looks up airports, fetches flight offers for a route and date, and serves
//! them sorted and paged for an infinite-scrolling results list.

pub mod airports;
pub mod bookmarks;
pub mod cache;
pub mod config;
pub mod domain;
pub mod provider;
pub mod results;
pub mod session;
pub mod web;
