//! Shoplite API library.
//!
//! This crate provides the API functionality as a library, allowing it to be
//! tested in-process and reused by the binary in `src/main.rs`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
