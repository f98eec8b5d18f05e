//! Tolkien relation map integration tests
//!
//! Bidirectional consistency for every cardinality, relation events and
//! composition.

mod compose_tests;
mod consistency_tests;
mod relation_tests;
