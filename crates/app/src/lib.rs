//! # minirelay-app
//!
//! Application layer — the stateful switch component and **port
//! definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `Input` / `Output` / `PowerMeter` — the pin driver layer
//!   - `ConfigStore` — durable configuration tree
//!   - `Timer` — one-shot delayed callbacks
//!   - `StateObserver` — receivers of state-change notifications
//! - Provide the [`Switch`](switch::Switch) component that drives those ports
//!   from input events, remote commands and the auto-off timer
//! - Provide **in-process infrastructure** (state-change bus) that doesn't
//!   need IO
//! - Wire peripherals and switches together in hardware-safe order
//!   ([`composition`])
//!
//! ## Dependency rule
//! Depends on `minirelay-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.
//!
//! ## Threading
//! Everything here runs on a single thread. Ports are shared through `Rc`
//! and callbacks only hold `Weak` references back into a switch.

pub mod bus;
pub mod composition;
pub mod ports;
pub mod switch;

#[cfg(test)]
pub(crate) mod testing;
