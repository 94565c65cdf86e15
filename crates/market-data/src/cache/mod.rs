//! Short-lived caching and request coalescing.
//!
//! - [`CacheStore`] holds `(value, inserted_at)` entries; the caller owns the TTL.
//! - [`InFlightRegistry`] keeps at most one upstream fetch outstanding per key.
//! - [`RequestCache`] composes both into the fetch lifecycle used by the services.

mod in_flight;
mod key;
mod request_cache;
mod store;

pub use in_flight::{Flight, FlightGuard, FlightHandle, InFlightRegistry};
pub use key::{normalize_identifier, CacheKey};
pub use request_cache::{RateLimitPolicy, RequestCache};
pub use store::{CacheLookup, CacheStore};
