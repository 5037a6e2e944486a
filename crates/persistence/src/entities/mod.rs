//! Database row types, converted into domain models by the repositories.

mod account;
mod activity_log;
mod candidate;
mod citizen;
mod message;
mod news;
mod promise;
mod rating;
mod vote;

pub use account::*;
pub use activity_log::*;
pub use candidate::*;
pub use citizen::*;
pub use message::*;
pub use news::*;
pub use promise::*;
pub use rating::*;
pub use vote::*;
