pub mod clear;
pub mod common;
pub mod layout;
pub mod list;
pub mod refresh;
pub mod watch;
