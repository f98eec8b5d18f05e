//! Event layer integration tests
//!
//! Listener registration and filtering as seen through the containers.

mod listener_tests;
