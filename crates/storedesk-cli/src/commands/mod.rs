//! Command handlers grouped by concern.

mod resources;

pub(crate) use resources::run_resource;
