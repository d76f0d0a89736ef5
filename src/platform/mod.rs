//! Platform backends
//!
//! - Native: JSON file storage
//! - Web: LocalStorage and the `wasm_bindgen` entry points

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(target_arch = "wasm32")]
pub mod web;
#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorageStore, WebGame};
