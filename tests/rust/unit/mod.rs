//! Unit tests - pipeline behaviour through the public API, no files involved.

mod descriptor_parsing_tests;
mod resolution_properties_tests;
