//! Livebox sysbus API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::StaticLeaseApi;
use crate::error::{Result, SyncError};
use crate::models::StaticLease;

const GET_STATIC_LEASES: &str = "/sysbus/DHCPv4/Server/Pool/default:getStaticLeases";
const ADD_STATIC_LEASE: &str = "/sysbus/DHCPv4/Server/Pool/default:addStaticLease";
const DELETE_STATIC_LEASE: &str = "/sysbus/DHCPv4/Server/Pool/default:deleteStaticLease";

/// Authenticated session: context token plus the cookies set at login
#[derive(Debug, Clone)]
struct Session {
    context_id: String,
    cookies: Vec<String>,
}

impl Session {
    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            None
        } else {
            Some(self.cookies.join("; "))
        }
    }
}

#[derive(Debug, Deserialize)]
struct LeaseRecord {
    #[serde(rename = "IPAddress")]
    ip_address: String,
    #[serde(rename = "MACAddress")]
    mac_address: String,
}

pub struct LiveboxClient {
    base_url: String,
    http_client: Client,
    session: Option<Session>,
}

impl LiveboxClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| SyncError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            session: None,
        })
    }

    /// Log in and keep the returned context token and cookies for later calls.
    ///
    /// Any previously held session is dropped first, so a rejected login
    /// leaves the client unauthenticated.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<String> {
        self.session = None;

        let url = format!("{}/authenticate", self.base_url);
        let resp = self
            .http_client
            .post(&url)
            .query(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| SyncError::Request(format!("Authentication request failed: {}", e)))?;

        let cookies: Vec<String> = resp
            .cookies()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect();

        let body: Value = resp
            .json()
            .await
            .map_err(|e| SyncError::Authentication(format!("Malformed response: {}", e)))?;

        match body.get("status").and_then(Value::as_i64) {
            Some(0) => {}
            Some(status) => {
                tracing::warn!("[Livebox] Authentication rejected (status {})", status);
                return Err(SyncError::Authentication(format!(
                    "Router returned status {}",
                    status
                )));
            }
            None => {
                return Err(SyncError::Authentication(
                    "Response has no numeric status".to_string(),
                ))
            }
        }

        let context_id = body
            .pointer("/data/contextID")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::Authentication("Response has no data.contextID".to_string()))?
            .to_string();

        tracing::info!(
            "[Livebox] Authenticated as {} ({} cookies)",
            username,
            cookies.len()
        );

        self.session = Some(Session {
            context_id: context_id.clone(),
            cookies,
        });

        Ok(context_id)
    }

    /// POST `{"parameters": params}` to a sysbus path within the current session
    pub async fn send_request(&self, path: &str, params: Value) -> Result<Value> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| SyncError::Authentication("Not authenticated".to_string()))?;

        tracing::debug!("[Livebox] POST {}", path);

        let mut req = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .header("X-Context", &session.context_id)
            .json(&json!({ "parameters": params }));
        if let Some(cookie) = session.cookie_header() {
            req = req.header(COOKIE, cookie);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| SyncError::Request(format!("{} failed: {}", path, e)))?;

        resp.json()
            .await
            .map_err(|e| SyncError::Request(format!("{} parse failed: {}", path, e)))
    }
}

/// Router-reported failures come back as a payload carrying an `errors` key
fn check_errors(body: Value) -> Result<()> {
    if body.get("errors").is_some() {
        return Err(SyncError::Operation(body));
    }
    Ok(())
}

#[async_trait]
impl StaticLeaseApi for LiveboxClient {
    async fn list_leases(&self) -> Result<Vec<StaticLease>> {
        let mut body = self.send_request(GET_STATIC_LEASES, json!({})).await?;

        let records = body
            .get_mut("status")
            .map(Value::take)
            .ok_or_else(|| SyncError::Request("getStaticLeases: no status in response".to_string()))?;
        let records: Vec<LeaseRecord> = serde_json::from_value(records)
            .map_err(|e| SyncError::Request(format!("getStaticLeases parse failed: {}", e)))?;

        Ok(records
            .into_iter()
            .map(|r| StaticLease::new(r.mac_address, r.ip_address))
            .collect())
    }

    async fn add_lease(&self, lease: &StaticLease) -> Result<()> {
        let body = self
            .send_request(
                ADD_STATIC_LEASE,
                json!({ "IPAddress": lease.ipv4(), "MACAddress": lease.mac() }),
            )
            .await?;
        check_errors(body)
    }

    async fn delete_lease(&self, lease: &StaticLease) -> Result<()> {
        let body = self
            .send_request(DELETE_STATIC_LEASE, json!({ "MACAddress": lease.mac() }))
            .await?;
        check_errors(body)
    }
}
