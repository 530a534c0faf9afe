//! Text module: styled text values.
//!
//! A [`Text`] is a plain string plus a list of [`Span`]s, each applying a
//! [`Style`](crate::style::Style) to a byte range. Text is what the ANSI
//! decoder produces and what the console prints.

mod span;
#[allow(clippy::module_inception)]
mod text;

pub use span::Span;
pub use text::Text;
