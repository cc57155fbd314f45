pub mod config;
pub mod init;
pub mod list;
pub mod start_stop;
pub mod update;
