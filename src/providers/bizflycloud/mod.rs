//! BizflyCloud DNS provider implementation

pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use client::{BizflyCloudClient, DnsApi};
pub use error::BizflyApiError;
pub use provider::BizflyCloudProvider;
