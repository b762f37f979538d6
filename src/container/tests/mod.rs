//! Tests for container decoding

mod decode_tests;
