pub mod file;
pub mod memory;

pub use file::FileSettingsStore;
pub use memory::InMemorySettingsStore;
