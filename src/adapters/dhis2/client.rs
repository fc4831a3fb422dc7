//! DHIS2 Web API client
//!
//! Implements [`SourceSystem`] against the DHIS2 Web API using basic
//! authentication. Every collection is requested with `paging=false` so a
//! single response holds the whole collection.

use super::models::{
    DataElementsResponse, EventsResponse, OrganisationUnitsResponse, ProgramStagesResponse,
    ProgramsResponse, TrackedEntityAttributesResponse, TrackedEntityInstancesResponse,
};
use crate::adapters::retry::retry_request;
use crate::adapters::traits::SourceSystem;
use crate::config::Dhis2Config;
use crate::domain::ids::{OrgUnitId, ProgramId, TrackedEntityId};
use crate::domain::{
    BridgeError, DataElement, Dhis2Error, Event, OrganisationUnit, Program, ProgramStage, Result,
    TrackedEntity, TrackedEntityAttribute,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

const NAMED_FIELDS: &str = "id,displayName";

/// DHIS2 client
///
/// # Example
///
/// ```no_run
/// use casebridge::adapters::dhis2::Dhis2Client;
/// use casebridge::adapters::SourceSystem;
/// use casebridge::config::load_config;
///
/// # async fn example() -> casebridge::domain::Result<()> {
/// let config = load_config("casebridge.toml")?;
/// let client = Dhis2Client::new(config.dhis2)?;
///
/// let programs = client.get_programs().await?;
/// println!("{} programs", programs.len());
/// # Ok(())
/// # }
/// ```
pub struct Dhis2Client {
    /// Base URL of the DHIS2 instance, without a trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// DHIS2 configuration
    config: Dhis2Config,
}

impl Dhis2Client {
    /// Create a new DHIS2 client
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: Dhis2Config) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!(base_url = %base_url, "TLS verification disabled for DHIS2");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            BridgeError::Configuration(format!("Failed to build DHIS2 HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Get the base URL of the DHIS2 instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the basic authorization header value
    fn auth_header_value(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.config.username,
            self.config.password.expose_secret().as_ref()
        );
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {encoded}")
    }

    /// GET `/api/{path}` and decode the JSON body, with retries
    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/api/{}", self.base_url, path);

        tracing::debug!(url = %url, query = ?query, "DHIS2 request");

        retry_request(&self.config.retry, || async {
            let resp = self
                .client
                .get(&url)
                .query(query)
                .header("Authorization", self.auth_header_value())
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| BridgeError::Dhis2(Dhis2Error::ConnectionFailed(e.to_string())))?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(BridgeError::Dhis2(status_error(status, format!("{path}: {body}"))));
            }

            resp.json::<T>().await.map_err(|e| {
                BridgeError::Dhis2(Dhis2Error::InvalidResponse(format!("{path}: {e}")))
            })
        })
        .await
    }
}

/// Map a non-success status to a [`Dhis2Error`]
fn status_error(status: StatusCode, message: String) -> Dhis2Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Dhis2Error::AuthenticationFailed(message)
        }
        s if s.is_server_error() => Dhis2Error::ServerError {
            status: s.as_u16(),
            message,
        },
        s => Dhis2Error::ClientError {
            status: s.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl SourceSystem for Dhis2Client {
    async fn get_programs(&self) -> Result<Vec<Program>> {
        let response: ProgramsResponse = self
            .get_json("programs", &[("paging", "false"), ("fields", NAMED_FIELDS)])
            .await?;
        Ok(response.programs)
    }

    async fn get_program_stages(&self) -> Result<Vec<ProgramStage>> {
        let response: ProgramStagesResponse = self
            .get_json(
                "programStages",
                &[("paging", "false"), ("fields", NAMED_FIELDS)],
            )
            .await?;
        Ok(response.program_stages)
    }

    async fn get_data_elements(&self) -> Result<Vec<DataElement>> {
        let response: DataElementsResponse = self
            .get_json(
                "dataElements",
                &[("paging", "false"), ("fields", NAMED_FIELDS)],
            )
            .await?;
        Ok(response.data_elements)
    }

    async fn get_tracked_entity_attributes(&self) -> Result<Vec<TrackedEntityAttribute>> {
        let response: TrackedEntityAttributesResponse = self
            .get_json(
                "trackedEntityAttributes",
                &[("paging", "false"), ("fields", NAMED_FIELDS)],
            )
            .await?;
        Ok(response.tracked_entity_attributes)
    }

    async fn get_organisation_units_from_parent(
        &self,
        root: &OrgUnitId,
    ) -> Result<Vec<OrganisationUnit>> {
        let path = format!("organisationUnits/{root}");
        let response: OrganisationUnitsResponse = self
            .get_json(
                &path,
                &[
                    ("includeDescendants", "true"),
                    ("paging", "false"),
                    ("fields", "id,displayName,parent[id]"),
                ],
            )
            .await?;

        Ok(response
            .organisation_units
            .into_iter()
            .map(OrganisationUnit::from)
            .collect())
    }

    async fn get_tracked_entity_instances(
        &self,
        org_unit: &OrgUnitId,
        program: &ProgramId,
    ) -> Result<Vec<TrackedEntity>> {
        let response: TrackedEntityInstancesResponse = self
            .get_json(
                "trackedEntityInstances",
                &[
                    ("ou", org_unit.as_str()),
                    ("program", program.as_str()),
                    ("paging", "false"),
                    ("fields", "trackedEntityInstance,orgUnit,attributes[attribute,value]"),
                ],
            )
            .await?;

        response
            .tracked_entity_instances
            .into_iter()
            .map(|record| record.into_domain())
            .collect()
    }

    async fn get_tracked_entity_events(&self, entity: &TrackedEntityId) -> Result<Vec<Event>> {
        let response: EventsResponse = self
            .get_json(
                "events",
                &[
                    ("trackedEntityInstance", entity.as_str()),
                    ("paging", "false"),
                    ("fields", "event,programStage,dataValues[dataElement,value]"),
                ],
            )
            .await?;

        response
            .events
            .into_iter()
            .map(|record| record.into_domain(entity))
            .collect()
    }
}
