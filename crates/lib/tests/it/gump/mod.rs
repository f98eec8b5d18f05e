//! GumpMap / GumpSet integration tests
//!
//! Path addressing, error behavior, iteration, event bubbling and the
//! incremental size accounting of nested maps.

mod helpers;
