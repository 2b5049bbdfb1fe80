//! # minirelay-domain
//!
//! Pure domain model for the minirelay two-channel relay controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define the **switch configuration** record, its wire encoding and the
//!   validation rules applied to remote configuration updates
//! - Define **input events** and how each input mode maps them onto the output
//! - Define the **transition rules** (persist / notify / auto-off timer) that
//!   every state write goes through
//! - Define the **info snapshot** returned to remote callers
//! - Plan the **accessory layout** (independent vs. legacy combined)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod device;
pub mod input;
pub mod layout;
pub mod switch;
