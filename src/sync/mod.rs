mod errors;
mod orchestrator;

pub use errors::SyncError;
pub use orchestrator::SyncService;
