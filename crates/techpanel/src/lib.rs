//! **techpanel** -- a terminal admin panel for lesson substitution requests.
//!
//! The panel runs on [`techpanel_core`]'s init/update/view loop. The model
//! in [`app`] owns every screen:
//!
//! * the new/edit form ([`editor`]) with searchable dropdowns and
//!   auto-resizing text areas,
//! * the history of sent requests ([`history`]),
//! * the admin screen ([`admin`]) with its console.
//!
//! Horizontal pointer swipes switch between the form (right) and history
//! (left). All network traffic goes through a [`FormBackend`]; the HTTP
//! implementation turns every failure into a structured outcome.
//!
//! ```ignore
//! let config = PanelConfig::load(None)?;
//! let client = AdminClient::new(&config.backend.base_url, config.request_timeout());
//! let backend = HttpBackend::new(client, config.backend.init_data.clone()).shared();
//! let flags = PanelFlags { config, backend, drafts: Drafts::in_memory(), size: (80, 24) };
//! techpanel_core::run_with::<PanelApp>(flags, ProgramOptions::default()).await?;
//! ```

pub mod admin;
pub mod app;
pub mod backend;
pub mod config;
pub mod drafts;
pub mod editor;
pub mod error;
pub mod form;
pub mod history;
pub mod http;
pub mod layout;
pub mod logging;

pub use app::{Destination, Msg, NavigationMode, PanelApp, PanelFlags, UiState};
pub use backend::{FormBackend, HttpBackend, SharedBackend};
pub use config::PanelConfig;
pub use drafts::{DraftSlot, Drafts};
pub use error::{ConfigError, PanelError};
pub use form::{HistoryEntry, ReplaceForm, SelectData};
pub use http::{AdminClient, GetOutcome, PostOutcome};
