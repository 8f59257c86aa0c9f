// Entry encoding and on-disk stores
//
// This module holds the dictionary entry codec, its display rendering and the
// key-value store files that persist one translation direction each.

pub mod direction;
pub mod entry;
pub mod render;
pub mod store_block;
pub mod kv_store;

pub use direction::Direction;
pub use entry::{DictEntry, EntryGroup, decode, parse_groups};
pub use render::{OutputFormat, render_groups};
pub use store_block::StoreBlock;
pub use kv_store::{KeyValueStore, MemoryStore, SealedStore, StoreReader, StoreWriter};
