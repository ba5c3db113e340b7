pub mod client;

pub use client::{DEFAULT_REGISTRY_URL, HttpRegistryClient, RegistryLookup};
