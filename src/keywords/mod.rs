// src/keywords/mod.rs
//! Headline keyword extraction: fold → tokenize → classify.

pub mod classify;
pub mod lexicon;
pub mod normalize;
pub mod tokenize;

pub use classify::{classify, parse_forced_keywords, singularize, title_keywords, Rule};
pub use normalize::normalize;
pub use tokenize::{tokenize, Token};
