pub mod compare;
pub mod init;
pub mod output;
pub mod questions;
pub mod score;
pub mod take;
pub mod validate;
