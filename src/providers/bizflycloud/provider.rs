use std::collections::HashMap;

use async_trait::async_trait;
use log::{debug, error, info};

use crate::config::Configuration;
use crate::core::domain_filter::DomainFilter;
use crate::core::endpoint::{Changes, Endpoint};
use crate::core::provider::DNSProvider;
use crate::error::Error;
use crate::providers::bizflycloud::client::{BizflyCloudClient, DnsApi};
use crate::providers::bizflycloud::error::{map_error, BizflyApiError};
use crate::providers::bizflycloud::types::{
    canonical_name, to_endpoint, ChangeAction, CreateRecordPayload, ListOptions, NormalRecord,
    RecordChange, UpdateRecordPayload, Zone, ZoneDetail,
};

/// Reconciles desired DNS state against BizflyCloud hosted zones.
///
/// Zones are processed strictly one at a time and changes strictly in
/// planner order; a single reconciliation pass issues no concurrent
/// requests and caches nothing across passes.
pub struct BizflyCloudProvider {
    client: Box<dyn DnsApi>,
    domain_filter: DomainFilter,
    api_page_size: u32,
    default_ttl: u32,
    dry_run: bool,
}

impl BizflyCloudProvider {
    /// Build a provider from configuration: compiles the domain filter and
    /// authenticates the API client. Any credential, filter or auth problem
    /// surfaces here, never later.
    pub async fn new(config: &Configuration) -> Result<Self, Error> {
        let domain_filter = config.domain_filter()?;
        info!("Creating BizflyCloud provider with {domain_filter}");
        let client = BizflyCloudClient::new(config).await.map_err(map_error)?;
        Ok(Self::with_client(Box::new(client), domain_filter, config))
    }

    /// Build a provider around an already-constructed client capability.
    pub fn with_client(
        client: Box<dyn DnsApi>,
        domain_filter: DomainFilter,
        config: &Configuration,
    ) -> Self {
        Self {
            client,
            domain_filter,
            api_page_size: config.api_page_size,
            default_ttl: config.default_ttl,
            dry_run: config.dry_run,
        }
    }

    /// Walk the paginated zone listing, keeping zones the domain filter
    /// accepts. Pages are disjoint, so no deduplication happens. A remote
    /// error aborts the whole listing with no partial result.
    async fn list_zones_with_pagination(&self) -> Result<Vec<Zone>, BizflyApiError> {
        let mut zones = Vec::new();
        let mut opts = ListOptions {
            page: 1,
            limit: self.api_page_size,
        };
        loop {
            let response = self.client.list_zones(&opts).await?;
            for zone in response.zones {
                if self.domain_filter.matches(&zone.name) {
                    zones.push(zone);
                }
            }
            if opts.page * opts.limit >= response.meta.max_results {
                break;
            }
            opts.page += 1;
        }
        Ok(zones)
    }

    fn new_record_change(&self, action: ChangeAction, endpoint: &Endpoint) -> RecordChange {
        let ttl = endpoint.ttl.filter(|ttl| *ttl > 0).unwrap_or(self.default_ttl);
        RecordChange {
            action,
            record: NormalRecord {
                name: endpoint.dns_name.clone(),
                record_type: endpoint.record_type.clone(),
                ttl,
                data: endpoint.targets.clone(),
            },
        }
    }

    /// Flatten the desired diff into typed changes: the create block, then
    /// the update block, then the delete block, input order preserved
    /// within each. Only the new side of an update pair carries state.
    fn plan_changes(&self, changes: &Changes) -> Vec<RecordChange> {
        let mut planned = Vec::new();
        for endpoint in &changes.create {
            planned.push(self.new_record_change(ChangeAction::Create, endpoint));
        }
        for endpoint in &changes.update_new {
            planned.push(self.new_record_change(ChangeAction::Update, endpoint));
        }
        for endpoint in &changes.delete {
            planned.push(self.new_record_change(ChangeAction::Delete, endpoint));
        }
        planned
    }

    /// Partition changes by owning zone. Every known zone gets an entry,
    /// empty when nothing targets it. A change matching no zone is dropped
    /// with a diagnostic and the pass continues.
    fn group_changes_by_zone(
        &self,
        zones: &[Zone],
        changes: Vec<RecordChange>,
    ) -> HashMap<String, Vec<RecordChange>> {
        let mut grouped: HashMap<String, Vec<RecordChange>> = zones
            .iter()
            .map(|zone| (zone.id.clone(), Vec::new()))
            .collect();
        for change in changes {
            let Some(zone) = zones
                .iter()
                .find(|zone| zone_contains(&zone.name, &change.record.name))
            else {
                debug!(
                    "Skipping record {} because no hosted zone matching the record DNS name was detected",
                    change.record.name
                );
                continue;
            };
            if let Some(entry) = grouped.get_mut(&zone.id) {
                entry.push(change);
            }
        }
        grouped
    }

    /// Resolve a change to the id of the existing record with the same
    /// canonical name and type, the only stable handle for update/delete.
    fn get_record_id(&self, zone: &ZoneDetail, record: &NormalRecord) -> Option<String> {
        zone.records_set
            .iter()
            .find(|zone_record| {
                canonical_name(&zone.zone.name, &zone_record.name) == record.name
                    && zone_record.record_type == record.record_type
            })
            .map(|zone_record| zone_record.id.clone())
    }

    async fn submit_changes(&self, changes: Vec<RecordChange>) -> Result<(), Error> {
        if changes.is_empty() {
            info!("All records are already up to date");
            return Ok(());
        }

        let zones = self.list_zones_with_pagination().await.map_err(map_error)?;
        let grouped = self.group_changes_by_zone(&zones, changes);

        for (zone_id, zone_changes) in &grouped {
            if zone_changes.is_empty() {
                continue;
            }
            let detail = self.client.get_zone(zone_id).await.map_err(|e| {
                Error::Provider(format!("could not fetch records from zone {zone_id}: {e}"))
            })?;
            for change in zone_changes {
                let record = &change.record;
                info!(
                    "Changing record {} type {} ttl {} action {} in zone {}",
                    record.name, record.record_type, record.ttl, change.action, zone_id
                );

                if self.dry_run {
                    continue;
                }

                match change.action {
                    ChangeAction::Update => {
                        let Some(record_id) = self.get_record_id(&detail, record) else {
                            error!(
                                "Failed to find previous record {} type {} in zone {zone_id}",
                                record.name, record.record_type
                            );
                            continue;
                        };
                        let payload = UpdateRecordPayload::from(change);
                        if let Err(e) = self.client.update_record(&record_id, &payload).await {
                            error!("Failed to update record {}: {e}", record.name);
                        }
                    }
                    ChangeAction::Delete => {
                        let Some(record_id) = self.get_record_id(&detail, record) else {
                            error!(
                                "Failed to find previous record {} type {} in zone {zone_id}",
                                record.name, record.record_type
                            );
                            continue;
                        };
                        if let Err(e) = self.client.delete_record(&record_id).await {
                            error!("Failed to delete record {}: {e}", record.name);
                        }
                    }
                    ChangeAction::Create => {
                        let payload = CreateRecordPayload::from(change);
                        if let Err(e) = self.client.create_record(zone_id, &payload).await {
                            error!("Failed to create record {}: {e}", record.name);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// Ownership needs a label boundary: "bar.com" owns "foo.bar.com" and
// "bar.com" itself, never "foobar.com". The remote zone set is assumed
// non-overlapping, so the first matching zone is authoritative.
fn zone_contains(zone_name: &str, record_name: &str) -> bool {
    record_name == zone_name || record_name.ends_with(&format!(".{zone_name}"))
}

#[async_trait]
impl DNSProvider for BizflyCloudProvider {
    fn name(&self) -> &str {
        "bizflycloud"
    }

    async fn records(&self) -> Result<Vec<Endpoint>, Error> {
        let zones = self.list_zones_with_pagination().await.map_err(map_error)?;

        let mut endpoints = Vec::new();
        for zone in &zones {
            let detail = self.client.get_zone(&zone.id).await.map_err(map_error)?;
            for record in &detail.records_set {
                if let Some(endpoint) = to_endpoint(&zone.name, record).map_err(map_error)? {
                    endpoints.push(endpoint);
                }
            }
        }
        Ok(endpoints)
    }

    async fn apply_changes(&self, changes: &Changes) -> Result<(), Error> {
        self.submit_changes(self.plan_changes(changes)).await
    }
}
