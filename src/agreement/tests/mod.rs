//! Unit tests for agreement lifecycle management.

mod support;
