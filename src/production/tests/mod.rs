//! Unit tests for production analytics.
