pub mod client;
pub mod error;
pub mod normalize;
pub mod types;
pub mod validate;

pub use client::LightspeedClient;
pub use error::LightspeedError;
pub use normalize::{normalize_unit, NormalizedUnit};
pub use types::{RawResponse, RawUnitRecord};
pub use validate::validate_response;
