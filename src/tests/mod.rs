//! Unit tests for the tracker engine.

mod access_tests;
mod board_tests;
mod plan_tests;
mod protocol_tests;
mod support;
mod trigger_tests;
