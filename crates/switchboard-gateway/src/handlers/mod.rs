//! HTTP request handlers.
//!
//! This module contains the endpoint handlers for the gateway API.

pub mod api;
pub mod login;
