pub mod application;
pub mod checklist;
pub mod history;
pub mod member;
pub mod settings;
pub mod state_change;
pub mod withdrawal;
