//! In-memory stores behind the dashboard pages. Each store is plain data plus
//! the rules for changing it; locking, persistence and latency live in `services`.

pub mod catalog;
pub mod header;
pub mod labels;
pub mod team;
pub mod website;
pub mod workspace;

pub use catalog::ServiceCatalog;
pub use header::HeaderPanels;
pub use labels::LabelRegistry;
pub use team::TeamStore;
pub use website::WebsiteDocument;
pub use workspace::Workspaces;
