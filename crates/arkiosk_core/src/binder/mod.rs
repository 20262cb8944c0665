//! Binding of model and video content to the tracked anchor.
//!
//! [`ContentBinder`] guarantees at most one [`AnchorContent`] exists and
//! that the previous one is fully disposed before its replacement is
//! attached.

mod content;
mod content_binder;

pub use content::AnchorContent;
pub use content_binder::{BinderStats, ContentBinder};
