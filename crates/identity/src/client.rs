//! HTTP client for the external client-directory + OTP API.

use std::time::Duration;

use {
    async_trait::async_trait,
    reqwest::StatusCode,
    serde::{Deserialize, Serialize},
    tracing::debug,
};

use crate::{
    error::{Error, Result},
    record::{IdentityDirectory, IdentityRecord, OtpChannel},
};

#[derive(Serialize)]
struct OtpSendRequest<'a> {
    client_id: &'a str,
}

#[derive(Deserialize)]
struct OtpSendResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct OtpVerifyRequest<'a> {
    client_id: &'a str,
    otp: &'a str,
}

#[derive(Deserialize)]
struct OtpVerifyResponse {
    valid: bool,
}

/// Client for the external directory API.
///
/// Endpoints (relative to `base_url`):
/// - `GET  /clients/lookup?phone=…`
/// - `GET  /clients/{code}`
/// - `POST /otp/send`
/// - `POST /otp/verify`
///
/// Every request carries the configured timeout; a timed-out call surfaces as
/// [`Error::Transport`] and lands on the failed branch of the contract.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    base_url: String,
    http: reqwest::Client,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport("build http client", e))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn fetch_record(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<Option<IdentityRecord>> {
        let resp = request
            .send()
            .await
            .map_err(|e| Error::transport(context, e))?;
        match resp.status() {
            StatusCode::OK => {
                let record: IdentityRecord = resp
                    .json()
                    .await
                    .map_err(|e| Error::transport(context, e))?;
                Ok(Some(record))
            },
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(Error::status(context, status.as_u16())),
        }
    }
}

#[async_trait]
impl IdentityDirectory for DirectoryClient {
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<IdentityRecord>> {
        let request = self
            .http
            .get(format!("{}/clients/lookup", self.base_url))
            .query(&[("phone", phone)]);
        self.fetch_record(request, "phone lookup").await
    }

    async fn lookup_by_client_code(&self, code: &str) -> Result<Option<IdentityRecord>> {
        let request = self.http.get(format!("{}/clients/{code}", self.base_url));
        self.fetch_record(request, "client code lookup").await
    }
}

#[async_trait]
impl OtpChannel for DirectoryClient {
    async fn send_otp(&self, client_id: &str) -> Result<bool> {
        let resp = self
            .http
            .post(format!("{}/otp/send", self.base_url))
            .json(&OtpSendRequest { client_id })
            .send()
            .await
            .map_err(|e| Error::transport("otp send", e))?;
        match resp.status() {
            StatusCode::OK => {
                let body: OtpSendResponse = resp
                    .json()
                    .await
                    .map_err(|e| Error::transport("otp send", e))?;
                debug!(client_id, result = %body.message, "otp send result");
                Ok(body.success)
            },
            // Unknown client on the provider side is a refusal, not a fault.
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(Error::status("otp send", status.as_u16())),
        }
    }

    async fn verify_otp(&self, client_id: &str, code: &str) -> Result<bool> {
        let resp = self
            .http
            .post(format!("{}/otp/verify", self.base_url))
            .json(&OtpVerifyRequest {
                client_id,
                otp: code,
            })
            .send()
            .await
            .map_err(|e| Error::transport("otp verify", e))?;
        match resp.status() {
            StatusCode::OK => {
                let body: OtpVerifyResponse = resp
                    .json()
                    .await
                    .map_err(|e| Error::transport("otp verify", e))?;
                Ok(body.valid)
            },
            status => Err(Error::status("otp verify", status.as_u16())),
        }
    }
}
