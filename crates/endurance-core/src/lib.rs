//! # endurance-core
//!
//! Foundational types shared across the Endurance crates:
//! - [`Endpoint`] identifiers for every dashboard and AI route
//! - The outward JSON [`envelope`] (`hasData` / `status` discriminators)
//! - The [`FallbackTable`] of static payloads served when a backend fails
//! - Row [`normalize`] helpers for the three stores' numeric encodings
//! - Division-guarded [`math`] used by every metric composer
//! - Query parameter validation ([`params`])
//! - Cross-cutting error types

pub mod endpoint;
pub mod envelope;
pub mod errors;
pub mod fallback;
pub mod math;
pub mod normalize;
pub mod params;

pub use endpoint::{Discriminator, Endpoint};
pub use errors::CoreError;
pub use fallback::{FallbackTable, Placeholders};
