//! Widgets for the **techpanel** admin panel.
//!
//! Every interactive widget implements [`techpanel_core::Component`] and can
//! be driven from a model's `update` by forwarding its messages.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`searchable_select`] | Dropdown with type-to-filter search box |
//! | [`dropdown_group`] | Keeps at most one dropdown open, routes clicks |
//! | [`swipe`] | Swipe recognition from press/release pairs |
//! | [`tabs`] | Navigation tabs with click hit-testing |
//! | [`auto_textarea`] | Multi-line box that grows with its text |
//! | [`text_input`] | Single-line field, optionally masked |
//! | [`console`] | Newest-first result log |
//! | [`button`] | Button guarded against re-entrant presses |
//! | [`focus`] | Focus cycling across fields |
//! | [`runeutil`] | Unicode width, truncation and wrapping |

pub mod auto_textarea;
pub mod button;
pub mod console;
pub mod dropdown_group;
pub mod focus;
pub mod runeutil;
pub mod searchable_select;
pub mod swipe;
pub mod tabs;
pub mod text_input;

pub use auto_textarea::AutoResizeTextArea;
pub use button::GuardedButton;
pub use console::ConsoleLog;
pub use dropdown_group::DropdownGroup;
pub use focus::FocusRing;
pub use searchable_select::{ChangeEvent, DropdownOption, DropdownState, SearchableSelect};
pub use swipe::{CellScale, Point, Swipe, SwipeConfig, SwipeTracker};
pub use tabs::NavTabs;
pub use text_input::{EchoMode, TextInput};
