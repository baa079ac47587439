//! Automation entry points consumed by the OS-level shortcut runtime.
//!
//! By contract these never propagate errors: every failure path yields a
//! neutral result (empty JSON array, silent no-op, bundled default photo)
//! inside a bounded time budget.

pub mod photo;
pub mod poll;
pub mod reply;
pub mod transport;

pub use photo::LeadPhotoStore;
pub use poll::PollClient;
pub use reply::ReplyClient;
pub use transport::{ApiTransport, FetchedResponse, HttpTransport};
