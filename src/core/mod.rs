//! # Core Application Logic
//!
//! The data model and state machines of both demo screens.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Message store        │
//!                    │  • Composer state       │
//!                    │  • Action → update()    │
//!                    │  • Goal board           │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │ ───── capability ──────► │  Platform  │
//!     │  Adapter   │ ◄──── Action ─────────── │  (desktop) │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: The `Message` sum type and its identifiers
//! - [`store`]: Newest-first message collection
//! - [`composer`]: Draft, focus and recording state
//! - [`status`]: Connectivity banner with its fade deadline
//! - [`state`]: The `App` struct, root of the messaging screen
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`goals`]: The goal list screen
//! - [`config`]: Settings resolution

pub mod action;
pub mod composer;
pub mod config;
pub mod goals;
pub mod message;
pub mod state;
pub mod status;
pub mod store;
