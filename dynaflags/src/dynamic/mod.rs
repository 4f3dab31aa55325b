//! Templated per-instance flags of the form `--group.id.field`.
//!
//! A [`DynamicGroup`] declares fields once; instance IDs come into existence
//! the first time argv names them. Storage lives inside each field's
//! [`DynamicValue`], so a group's instances are always derived from what
//! its fields hold.

mod group;
mod resolve;
mod value;

pub use group::{DynamicField, DynamicFlag, DynamicGroup};
pub use resolve::DynamicName;
pub use value::{DynamicScalarValue, DynamicSliceValue, DynamicValue};

pub(crate) use resolve::DynamicRegistry;
