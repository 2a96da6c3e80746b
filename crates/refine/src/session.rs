pub mod file;
pub mod locks;
pub mod memory;
pub mod state;
pub mod store;

pub use file::FileSessionStore;
pub use locks::OwnerLocks;
pub use memory::MemorySessionStore;
pub use state::SessionState;
pub use store::{SessionStore, SharedSessionStore};
