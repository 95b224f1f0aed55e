//! Subcommand implementations.

pub mod catalog;
pub mod order;
pub mod render;

/// Write a block of output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{}", text.trim_end());
}
