pub mod gaps;
pub mod init;
pub mod member;
pub mod path;
pub mod show;
pub mod update;
