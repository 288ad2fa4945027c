//! Unit tests for individual components.

mod decoder_tests;
mod settings_tests;
mod snapshot_tests;
