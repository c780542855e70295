pub mod application;
pub mod auth;
pub mod capacity;
pub mod checklist;
pub mod db;
pub mod member;
pub mod settings;
pub mod state_change;
pub mod tokener;
pub mod withdrawal;

#[cfg(test)]
pub mod testing;
