// regon-core: Registry lookups (search, reports, classification) over regon-api

pub mod client;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod report;
pub mod views;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::{RegonClient, SearchQuery};
pub use config::ClientConfig;
pub use error::CoreError;
pub use model::{
    AddressView, Classification, ContactView, EntitySummary, FullReport, Record,
};
pub use report::EntityKind;
