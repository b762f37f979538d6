//! Tests for stripping and injection
