//! Platform glue: turns winit window events into per-frame
//! [`quill_core::FrameInput`] samples and, with the `desktop` feature, runs a
//! window that presents a software-rendered screen.

pub mod input;
pub use input::{WinitInput, map_button, map_key};

#[cfg(feature = "desktop")]
pub mod desktop;
#[cfg(feature = "desktop")]
pub use desktop::{DesktopConfig, run_desktop};
