//! Minimal image gallery server
//!
//! Accepts JPEG/PNG uploads, stores them under content-addressed names and
//! renders them through a runtime template.

pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod storage;
pub mod template;
