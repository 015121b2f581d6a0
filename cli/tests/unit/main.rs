//! Unit tests for course-provision
//!
//! These tests use recording test doubles and run fast without spawning
//! external tools.

#![cfg(unix)]

mod helpers;
mod mocks;
