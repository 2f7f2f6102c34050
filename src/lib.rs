// Main library entry point for Tracelens.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
