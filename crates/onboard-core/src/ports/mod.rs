//! Ports (hexagonal boundaries) of the onboarding core.
//!
//! Implementations live in the infrastructure layer; use cases depend only
//! on these traits.

pub mod auth;
pub mod avatar_cache;
pub mod errors;
pub mod image_codec;
pub mod kv;
pub mod profile;

pub use auth::AuthGatewayPort;
pub use avatar_cache::{AvatarCachePort, AVATAR_CACHE_KEY};
pub use errors::GatewayError;
pub use image_codec::{ImageCodecError, ImageCodecPort};
pub use kv::KvStorePort;
pub use profile::ProfileGatewayPort;
