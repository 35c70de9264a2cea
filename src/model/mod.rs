//! Data model for extracted entry documentation.

mod card;

pub use card::{Card, Row};
