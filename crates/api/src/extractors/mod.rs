mod auth;
mod client_meta;

pub use auth::{AdminUser, CandidateUser, CurrentUser, OptionalUser};
pub use client_meta::ClientMeta;
