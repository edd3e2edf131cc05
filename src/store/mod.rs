// Dashboard state store and its periodic updater

mod engine;
mod ticker;
mod update;

pub use engine::DashboardStore;
pub use ticker::{spawn_updater, UpdaterHandle};
pub use update::{DashboardSnapshot, Lifecycle, StoreUpdate};
