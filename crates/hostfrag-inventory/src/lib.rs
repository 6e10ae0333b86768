//! hostfrag-inventory: dynamic inventory assembly
//!
//! Builds a host-orchestration inventory from a tree of JSON fragments: one
//! file per group (`hosts` + `vars`) and one per host (`vars`). The reserved
//! `all` group supplies baseline vars that every other group inherits and may
//! override. Host vars are reported as declared, without inheritance.

pub mod assembler;
pub mod builder;
pub mod config;
pub mod defaults;
pub mod directory;
pub mod error;
pub mod hostvars;
pub mod memory;
pub mod store;
pub mod types;

pub use builder::{InventoryBuilder, Query, to_pretty_json};
pub use config::DataLayout;
pub use defaults::{BASELINE_GROUP, load_default_vars};
pub use directory::DirectoryStore;
pub use error::InventoryError;
pub use memory::MemoryStore;
pub use store::{FragmentKind, FragmentRef, FragmentStore};
pub use types::{GroupEntry, Inventory, META_KEY, Meta, Vars};
