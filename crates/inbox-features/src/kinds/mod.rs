//! Concrete feature kinds.

pub mod binary;
pub mod compound;
pub mod dynamic;
pub mod numeric;
pub mod one_of_n;

pub use binary::BinaryFeature;
pub use compound::CompoundFeature;
pub use dynamic::DynamicFeature;
pub use numeric::NumericFeature;
pub use one_of_n::OneOfNFeature;
