//! Infrastructure adapters for Onboard.
//!
//! Concrete implementations of the core ports: mocked API gateway,
//! SQLite-backed avatar cache, file-backed key-value shim and the image
//! codec.

pub mod config;
pub mod db;
pub mod gateway;
pub mod image_codec;
pub mod kv;

pub use config::InfraConfig;
pub use gateway::MockApiGateway;
pub use image_codec::ImageCodec;
