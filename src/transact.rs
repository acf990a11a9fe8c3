//! Transactional operations spanning several items.
//!
//! Each participant of a transaction is its own builder with its own attribute
//! name and value registries, so `:pN` placeholders restart at `:p0` for every
//! put, update, delete, condition check and get.

/// Transact get items operation reading up to 100 items atomically.
pub mod transact_get_items;

/// Transact write items operation applying puts, updates, deletes and condition checks atomically.
pub mod transact_write_items;
