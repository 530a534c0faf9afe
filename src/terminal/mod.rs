//! Terminal output: assembling escape sequences for the console.

mod output;

pub use output::OutputBuffer;
