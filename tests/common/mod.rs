//! Common test utilities for choropleth.
//!
//! Fixture builders, a throwaway HTTP server for geometry payloads and
//! floating-point assertions.

pub mod assertions;
pub mod fixture_server;
pub mod test_data;
