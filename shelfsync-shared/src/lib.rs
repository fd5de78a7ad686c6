//! Shared models for the Shelfsync platform.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
