//! Helpers shared by use cases. Not part of the public surface.

pub(crate) mod report;
