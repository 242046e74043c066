//! # TUI Components
//!
//! UI pieces of the two demo screens.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything they draw as parameters:
//! - `StatusBar`: app name, status message, connectivity banner
//! - `Bubble`: a single message
//! - `Fullscreen` / `Dialog`: image/map view, delete prompt, alerts
//!
//! ### Stateful Components (Event-Driven)
//!
//! Transient wrappers around state the screen keeps between frames. They
//! translate `TuiEvent`s into their own event type and never touch `App`:
//! - `ComposerInput`: text field plus media buttons
//! - `MessageList`: scrollable, newest-first conversation with layout caching
//! - `GoalList`: goal input, rows with delete buttons, the props modal
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── status_bar.rs    (Top line and connectivity banner)
//! ├── message.rs       (Single bubble renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── composer/        (Text input with media buttons)
//! ├── overlay.rs       (Fullscreen view and dialogs)
//! └── goal_list.rs     (Goal screen and modal sheet)
//! ```

pub mod composer;
pub mod goal_list;
pub mod message;
pub mod message_list;
pub mod overlay;
pub mod status_bar;
