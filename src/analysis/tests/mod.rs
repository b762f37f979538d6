//! Tests for the analysis pipeline

mod digest_tests;
mod coordinate_tests;
