//! Shared helpers for pw-client integration tests

pub mod stub_server;
