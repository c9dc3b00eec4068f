use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};

use crate::config::Configuration;
use crate::providers::bizflycloud::error::BizflyApiError;
use crate::providers::bizflycloud::types::{
    ApiErrorResponse, CreateRecordPayload, ListOptions, ListZonesResponse, Record,
    UpdateRecordPayload, ZoneDetail,
};

const AUTH_METHOD: &str = "application_credential";
const TOKEN_HEADER: &str = "X-Auth-Token";
const REGION_HEADER: &str = "X-Region";

/// The subset of the remote DNS API this provider actually uses.
/// Add operations as required.
#[async_trait]
pub trait DnsApi: Send + Sync {
    async fn list_zones(&self, opts: &ListOptions) -> Result<ListZonesResponse, BizflyApiError>;
    async fn get_zone(&self, zone_id: &str) -> Result<ZoneDetail, BizflyApiError>;
    async fn create_record(
        &self,
        zone_id: &str,
        payload: &CreateRecordPayload,
    ) -> Result<Record, BizflyApiError>;
    async fn update_record(
        &self,
        record_id: &str,
        payload: &UpdateRecordPayload,
    ) -> Result<Record, BizflyApiError>;
    async fn delete_record(&self, record_id: &str) -> Result<(), BizflyApiError>;
}

#[derive(serde::Serialize)]
struct TokenRequest<'a> {
    auth_method: &'a str,
    credential_id: &'a str,
    credential_secret: &'a str,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    token: String,
}

/// HTTP client for the BizflyCloud DNS API. Acquires a keystone token once
/// at construction; every later request sends it as a header. No retry or
/// token refresh, each call is a single attempt.
#[derive(Debug)]
pub struct BizflyCloudClient {
    client: Client,
    api_url: String,
    region: String,
    token: String,
}

impl BizflyCloudClient {
    pub async fn new(config: &Configuration) -> Result<Self, BizflyApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let token = Self::authenticate(&client, config).await?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            region: config.region.clone(),
            token,
        })
    }

    async fn authenticate(client: &Client, config: &Configuration) -> Result<String, BizflyApiError> {
        let request = TokenRequest {
            auth_method: AUTH_METHOD,
            credential_id: &config.api_credential_id,
            credential_secret: &config.api_credential_secret,
        };
        let response = client
            .post(format!("{}/token", config.api_url))
            .header(REGION_HEADER, &config.region)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(BizflyApiError::Auth(error_message(response).await));
        }
        let body: TokenResponse = response.json().await?;
        Ok(body.token)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.api_url))
            .header(TOKEN_HEADER, &self.token)
            .header(REGION_HEADER, &self.region)
    }

    async fn handle_request<T, F>(&self, fut: F) -> Result<T, BizflyApiError>
    where
        F: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
        T: serde::de::DeserializeOwned,
    {
        let response = fut.await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(BizflyApiError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }
}

async fn error_message(response: reqwest::Response) -> String {
    response
        .json::<ApiErrorResponse>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| "unknown error".to_string())
}

#[async_trait]
impl DnsApi for BizflyCloudClient {
    async fn list_zones(&self, opts: &ListOptions) -> Result<ListZonesResponse, BizflyApiError> {
        self.handle_request(
            self.request(Method::GET, "/dns/zones")
                .query(&[("page", opts.page), ("limit", opts.limit)])
                .send(),
        )
        .await
    }

    async fn get_zone(&self, zone_id: &str) -> Result<ZoneDetail, BizflyApiError> {
        self.handle_request(self.request(Method::GET, &format!("/dns/zone/{zone_id}")).send())
            .await
    }

    async fn create_record(
        &self,
        zone_id: &str,
        payload: &CreateRecordPayload,
    ) -> Result<Record, BizflyApiError> {
        self.handle_request(
            self.request(Method::POST, &format!("/dns/zone/{zone_id}/record"))
                .json(payload)
                .send(),
        )
        .await
    }

    async fn update_record(
        &self,
        record_id: &str,
        payload: &UpdateRecordPayload,
    ) -> Result<Record, BizflyApiError> {
        self.handle_request(
            self.request(Method::PUT, &format!("/dns/record/{record_id}"))
                .json(payload)
                .send(),
        )
        .await
    }

    async fn delete_record(&self, record_id: &str) -> Result<(), BizflyApiError> {
        let response = self
            .request(Method::DELETE, &format!("/dns/record/{record_id}"))
            .send()
            .await?;
        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            status => Err(BizflyApiError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;

    fn test_config(server: &MockServer) -> Configuration {
        Configuration {
            api_url: server.url(""),
            ..Configuration::default()
        }
    }

    async fn authed_client(server: &MockServer) -> BizflyCloudClient {
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(200)
                    .json_body_obj(&serde_json::json!({ "token": "keystone-token" }));
            })
            .await;
        let client = BizflyCloudClient::new(&test_config(server)).await.unwrap();
        token_mock.assert_async().await;
        client
    }

    #[tokio::test]
    async fn test_new_acquires_token_and_sends_it() {
        let server = MockServer::start_async().await;
        let client = authed_client(&server).await;

        let zones_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/dns/zones")
                    .header(TOKEN_HEADER, "keystone-token")
                    .query_param("page", "1")
                    .query_param("limit", "100");
                then.status(200).json_body_obj(&serde_json::json!({
                    "zones": [{ "id": "Z001", "name": "bar.com" }],
                    "_meta": { "max_results": 1 }
                }));
            })
            .await;

        let response = client
            .list_zones(&ListOptions { page: 1, limit: 100 })
            .await
            .unwrap();
        zones_mock.assert_async().await;
        assert_eq!(response.zones.len(), 1);
        assert_eq!(response.zones[0].name, "bar.com");
        assert_eq!(response.meta.max_results, 1);
    }

    #[tokio::test]
    async fn test_new_fails_on_rejected_credentials() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/token");
                then.status(401)
                    .json_body_obj(&serde_json::json!({ "message": "invalid credential" }));
            })
            .await;

        let result = BizflyCloudClient::new(&test_config(&server)).await;
        token_mock.assert_async().await;
        assert_matches!(result, Err(BizflyApiError::Auth(message)) if message == "invalid credential");
    }

    #[tokio::test]
    async fn test_get_zone_parses_record_set() {
        let server = MockServer::start_async().await;
        let client = authed_client(&server).await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/dns/zone/Z001");
                then.status(200).json_body_obj(&serde_json::json!({
                    "id": "Z001",
                    "name": "bar.com",
                    "records_set": [{
                        "id": "R001",
                        "zone_id": "Z001",
                        "name": "foobar",
                        "type": "A",
                        "ttl": 120,
                        "data": ["1.2.3.4", "3.4.5.6"]
                    }]
                }));
            })
            .await;

        let detail = client.get_zone("Z001").await.unwrap();
        assert_eq!(detail.zone.name, "bar.com");
        assert_eq!(detail.records_set.len(), 1);
        assert_eq!(detail.records_set[0].record_type, "A");
    }

    #[tokio::test]
    async fn test_mutation_paths_and_methods() {
        let server = MockServer::start_async().await;
        let client = authed_client(&server).await;

        let create_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/dns/zone/Z001/record")
                    .json_body_obj(&serde_json::json!({
                        "name": "new.bar.com",
                        "ttl": 60,
                        "type": "A",
                        "data": ["1.2.3.4"]
                    }));
                then.status(200).json_body_obj(&serde_json::json!({
                    "id": "R009", "zone_id": "Z001", "name": "new.bar.com",
                    "type": "A", "ttl": 60, "data": ["1.2.3.4"]
                }));
            })
            .await;
        let update_mock = server
            .mock_async(|when, then| {
                when.method(PUT).path("/dns/record/R001");
                then.status(200).json_body_obj(&serde_json::json!({
                    "id": "R001", "zone_id": "Z001", "name": "foobar",
                    "type": "A", "ttl": 60, "data": ["3.4.5.6"]
                }));
            })
            .await;
        let delete_mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/dns/record/R001");
                then.status(204);
            })
            .await;

        let payload = CreateRecordPayload {
            name: "new.bar.com".to_string(),
            ttl: 60,
            record_type: "A".to_string(),
            data: vec!["1.2.3.4".to_string()],
        };
        let created = client.create_record("Z001", &payload).await.unwrap();
        assert_eq!(created.id, "R009");

        let payload = UpdateRecordPayload {
            name: "foobar".to_string(),
            ttl: 60,
            record_type: "A".to_string(),
            data: vec!["3.4.5.6".to_string()],
        };
        client.update_record("R001", &payload).await.unwrap();
        client.delete_record("R001").await.unwrap();

        create_mock.assert_async().await;
        update_mock.assert_async().await;
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_carries_status_and_message() {
        let server = MockServer::start_async().await;
        let client = authed_client(&server).await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/dns/zone/Z404");
                then.status(404)
                    .json_body_obj(&serde_json::json!({ "message": "zone not found" }));
            })
            .await;

        let result = client.get_zone("Z404").await;
        assert_matches!(
            result,
            Err(BizflyApiError::Api { status: 404, message }) if message == "zone not found"
        );
    }
}
