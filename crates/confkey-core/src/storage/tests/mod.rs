// Storage strategy test modules
mod inner_tests;
mod list_tests;
mod map_tests;
