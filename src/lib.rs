pub mod assign;
pub mod backend;
pub mod cache;
pub mod config;
pub mod context;
pub mod editor;
pub mod error;
pub mod graph;
pub mod notify;
pub mod parse;
pub mod persist;
pub mod registry;
pub mod search;
pub mod simulate;
pub mod transform;
pub mod validate;
pub mod wasm;
