//! Background model maintenance run after every classified frame.
//!
//! A frame's maintenance is `reorder -> replace -> reorder`: templates are
//! sorted by efficacy, validated potential-background candidates overwrite the
//! weakest slot, and the order is settled again so a fresh template can be
//! promoted immediately.

pub(crate) mod ordering;
pub(crate) mod replacement;

pub use ordering::{order_pixel_templates, reorder_templates};
pub use replacement::{neighborhood, replace_templates, Window};
