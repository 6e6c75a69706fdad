//! Filesystem path helpers used by the standard location resolver and the
//! settings layer.

pub mod normalize;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;
