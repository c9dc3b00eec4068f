//! Reconciles DNS zone state held by BizflyCloud against desired records
//! supplied by an external-dns orchestrator, through its webhook transport.

pub mod config;
pub mod core;
pub mod error;
pub mod providers;

pub use crate::config::Configuration;
pub use crate::core::domain_filter::DomainFilter;
pub use crate::core::endpoint::{Changes, Endpoint};
pub use crate::core::provider::DNSProvider;
pub use crate::error::Error;
pub use crate::providers::bizflycloud::BizflyCloudProvider;
