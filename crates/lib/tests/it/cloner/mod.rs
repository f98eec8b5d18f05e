//! Cloner integration tests
//!
//! Deep copies of acyclic and cyclic graphs, custom cloneable types and the
//! rejection of unsupported values.

mod clone_tests;
mod custom_tests;
