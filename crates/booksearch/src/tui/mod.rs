//! Interactive search UI
//!
//! Architecture:
//! - Main thread: input events, controller ticks and rendering
//! - Worker threads (owned by the controller): search and detail requests
//!
//! Layout:
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ ▌ harry█                                                    │
//! ├───────────────────────────────────┬─────────────────────────┤
//! │ Results                           │ Detail                  │
//! │ > Harry Potter and the ...        │ Title    Harry Potter   │
//! │   Dirty Harry                     │ Authors  J. K. Rowling  │
//! ├───────────────────────────────────┴─────────────────────────┤
//! │ 2 results │ 12.3ms │ [↑↓ move] [Enter select] [Esc quit]      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod input;
mod ui;

pub use app::run;
