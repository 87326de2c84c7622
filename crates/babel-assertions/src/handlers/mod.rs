//! Built-in assertion handlers.

mod common;
mod nameres;
mod nodenorm;

pub use common::Needed;
pub use nameres::SearchByName;
pub use nodenorm::{DoesNotResolve, Resolves, ResolvesWith, ResolvesWithType};
