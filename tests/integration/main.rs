//! Integration tests for Bookmark-Sift
//!
//! These tests use wiremock to serve bookmarked pages and exercise the
//! renderer and the full scan-then-search cycle end-to-end.

mod render_tests;
mod scan_tests;
