//! Repositories, one per aggregate.

mod account;
mod activity_log;
mod backup;
mod candidate;
mod citizen;
mod message;
mod news;
mod promise;
mod rating;
mod reports;
mod vote;

pub use account::*;
pub use activity_log::*;
pub use backup::*;
pub use candidate::*;
pub use citizen::*;
pub use message::*;
pub use news::*;
pub use promise::*;
pub use rating::*;
pub use reports::*;
pub use vote::*;
