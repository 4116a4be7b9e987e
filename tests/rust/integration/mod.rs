//! Integration tests - whole-model scans loaded from files.
//!
//! These tests verify that loading, configuration and the resolver work
//! together the way the command line uses them.

mod model_scan_tests;
