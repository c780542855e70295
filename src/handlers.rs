pub mod application;
pub mod auth;
pub mod checklist;
pub mod member;
pub mod occupancy;
pub mod settings;
pub mod state_change;
pub mod withdrawal;
