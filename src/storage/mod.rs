//! Persistent storage: repository seams, lock primitive, file backend

pub mod file;
pub mod lock;
pub mod repository;

pub use file::FileStorage;
pub use lock::LockFile;
pub use repository::{NumberSequence, TicketRepository};
