pub mod storage_entries;

pub use storage_entries::Entity as StorageEntries;
