// Crate-level test modules
mod integration;
