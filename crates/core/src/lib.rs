//! Core business logic for EstateDesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state transitions live here.
//!
//! # Modules
//!
//! - `auth` - Roles, caller context, access policy, password hashing
//! - `termination` - Contract termination workflow
//! - `notification` - Tenant SMS notices

pub mod auth;
pub mod notification;
pub mod termination;
