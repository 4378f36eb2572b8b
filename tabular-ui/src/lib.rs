pub mod api;
pub mod cell;
pub mod config;
pub mod conflict;
pub mod controller;
pub mod error;

#[cfg(target_arch = "wasm32")]
pub mod dialog;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod interop;

pub use api::*;
pub use cell::*;
pub use config::*;
pub use conflict::*;
pub use controller::*;
pub use error::*;

#[cfg(target_arch = "wasm32")]
pub use dialog::*;
#[cfg(target_arch = "wasm32")]
pub use dom::*;
#[cfg(target_arch = "wasm32")]
pub use interop::*;
