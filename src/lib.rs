//! Waypost library exports for testing

pub mod catalog;
pub mod core;
pub mod harness;
pub mod screens;
pub mod shell;

#[cfg(test)]
pub mod test_support;
