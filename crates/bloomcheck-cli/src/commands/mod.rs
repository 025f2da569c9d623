pub mod analyze;
pub mod compare;
pub mod init;
pub mod list;
pub mod show;
pub mod stats;
pub mod validate;
