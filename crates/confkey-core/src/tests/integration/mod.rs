#![cfg(test)]

pub mod common;
pub mod enum_tests;
pub mod persistence_tests;
pub mod resolution_tests;
pub mod scenario_tests;
