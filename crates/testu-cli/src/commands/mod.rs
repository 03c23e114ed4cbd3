pub mod check;
pub mod history;
pub mod init;
pub mod models;
pub mod run;
pub mod stats;
