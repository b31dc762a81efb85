//! Query/transform layer over the delivery store.

pub mod history;
pub mod lifecycle;
