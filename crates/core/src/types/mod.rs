//! Core types for Palengke.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use role::Role;
pub use status::{OrderStatus, PaymentStatus};
