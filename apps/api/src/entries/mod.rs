// Primary store: the authoritative table of active entries.

pub mod handlers;
pub mod repository;
pub mod search;
