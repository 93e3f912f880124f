//! Snippet generation for the code pane.

mod generator;

pub use generator::generate_code;
