//! Cross-cutting utilities shared by the Naebak crates.

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
