pub mod chime;
pub mod config;
pub mod login;
pub mod run;
pub mod timer;
