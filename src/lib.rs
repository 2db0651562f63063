pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod log;
pub mod pushbullet;
