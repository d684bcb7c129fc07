// src/lib.rs

//! Supplier list and details view for procurement frameworks.
//!
//! Selecting a framework fetches its suppliers from `/suppliers/{framework}`
//! and renders one box each; clicking a box renders the supplier's details
//! and a draft email asking about unreported spend.

pub mod catalog;
pub mod config;
pub mod details;
pub mod driver;
pub mod error;
pub mod source;
pub mod supplier;
pub mod view;

use tracing_subscriber::EnvFilter;
//
pub use error::{Result, ViewError};
pub use source::{HttpSource, SupplierSource};
pub use supplier::{DetailValue, Supplier};
pub use view::{BoxId, FetchTicket, Panel, SupplierView, ViewEvent};

/// Initialise the global tracing subscriber.
///
/// `LOG_FORMAT=json` switches to JSON lines; anything else gets the
/// human-readable format. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var("LOG_FORMAT").unwrap_or_default();

    let result = match format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| ViewError::Tracing(e.to_string()))
}
