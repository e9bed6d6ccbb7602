//! Unit Converter Library
//!
//! Volume and weight conversion engine, plus the HTTP service around it.

pub mod build_info;
pub mod config;
pub mod conversion;
pub mod db;
pub mod features;
pub mod http;
pub mod models;
pub mod tools;
