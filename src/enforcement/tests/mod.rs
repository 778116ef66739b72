//! Unit tests for enforcement policies and the cached settings resolver.
