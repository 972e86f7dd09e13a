//! Integration test suite modules

mod catalog;
mod persistence;
mod staging;
mod streaming;
