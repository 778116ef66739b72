//! Unit tests for the task workflow module.

mod domain_tests;
mod repository_tests;
