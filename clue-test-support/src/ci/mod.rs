//! Helpers shared by CI-facing test configuration.

pub mod property_test_profile;
