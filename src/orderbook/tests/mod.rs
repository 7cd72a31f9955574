//! Behavior tests for the order book core.

mod book_tests;
