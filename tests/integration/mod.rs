//! Integration test suite for facet-graph
//!
//! End-to-end tests through the public API and the `facet-graph` binary.
//! Fetches go through [`MockTransport`](facet_graph::test_utils::MockTransport);
//! nothing here touches the network.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **graph_cache**: cache identity, fetch deduplication, terminal states,
//!   observers, cancellation, eviction
//! - **facets**: facet derivation over a scripted catalogue
//! - **config**: configuration files on disk
//! - **cli**: the `facet-graph` binary

mod cli;
mod config;
mod facets;
mod graph_cache;
