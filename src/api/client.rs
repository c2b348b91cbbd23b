//! Typed JSON client for the fleet backend.
//!
//! All paths are relative to an [`UpstreamTarget`], normally the dashboard
//! proxy's `/api` surface.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::config::upstream::{UpstreamTarget, DEFAULT_CLIENT_BASE};
use crate::model::{Car, CarCreate, ServiceRecord, ServiceRecordCreate};
use crate::resilience::with_not_found_fallback;

/// Environment variable holding the client base URL.
pub const CLIENT_BASE_ENV: &str = "FLEET_API_BASE_URL";

/// Operations the dashboard needs from the backend.
#[async_trait]
pub trait FleetApi: Send + Sync {
    /// All cars, in backend order.
    async fn list_cars(&self) -> ApiResult<Vec<Car>>;

    /// One car by id.
    async fn get_car(&self, id: i64) -> ApiResult<Car>;

    /// Create a car. `None` when the backend answers with an empty body.
    async fn create_car(&self, payload: &CarCreate) -> ApiResult<Option<Car>>;

    /// Delete a car.
    async fn delete_car(&self, id: i64) -> ApiResult<()>;

    /// Service records of one car, in backend order.
    async fn list_service_history(&self, car_id: i64) -> ApiResult<Vec<ServiceRecord>>;

    /// Record a service event for one car.
    async fn create_service_record(
        &self,
        car_id: i64,
        payload: &ServiceRecordCreate,
    ) -> ApiResult<Option<ServiceRecord>>;
}

/// HTTP implementation of [`FleetApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: UpstreamTarget,
}

impl ApiClient {
    pub fn new(base: UpstreamTarget) -> Self {
        Self::with_client(Client::new(), base)
    }

    /// Use a preconfigured `reqwest` client (timeouts, pooling).
    pub fn with_client(http: Client, base: UpstreamTarget) -> Self {
        Self { http, base }
    }

    /// Build from a raw base URL, defaulting to the local proxy.
    pub fn from_base_url(raw: Option<&str>) -> Self {
        Self::new(UpstreamTarget::resolve_with_default(raw, DEFAULT_CLIENT_BASE))
    }

    pub fn base(&self) -> &UpstreamTarget {
        &self.base
    }

    /// Issue one JSON request.
    ///
    /// Non-2xx becomes [`ApiError::Status`]; an empty (or `null`) 2xx body is
    /// `None`; an unparseable 2xx body is [`ApiError::InvalidJson`].
    async fn request<T>(&self, method: Method, path: &str, body: Option<String>) -> ApiResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        self.exchange(method, path, body).await.map(|(_, value)| value)
    }

    /// Like [`request`](Self::request), also returning the 2xx status.
    async fn exchange<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> ApiResult<(u16, Option<T>)>
    where
        T: DeserializeOwned + Send,
    {
        let (status, text) = self.send(method, path, body).await?;
        if text.is_empty() {
            return Ok((status, None));
        }

        match serde_json::from_str::<Option<T>>(&text) {
            Ok(value) => Ok((status, value)),
            Err(e) => {
                tracing::warn!(path, status, error = %e, "Invalid JSON response");
                Err(ApiError::InvalidJson { status, details: text })
            }
        }
    }

    /// Send one request and return the 2xx status with the raw body.
    async fn send(&self, method: Method, path: &str, body: Option<String>) -> ApiResult<(u16, String)> {
        let url = format!("{}{}", self.base.as_str(), path);
        tracing::debug!(method = %method, url = %url, "API request");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "API transport failure");
            ApiError::Transport(e)
        })?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            tracing::warn!(method = %method, url = %url, status, "API request failed");
            return Err(ApiError::Status { status, details: text });
        }
        Ok((status, text))
    }
}

fn encode<B: Serialize>(payload: &B) -> ApiResult<String> {
    serde_json::to_string(payload).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

#[async_trait]
impl FleetApi for ApiClient {
    async fn list_cars(&self) -> ApiResult<Vec<Car>> {
        Ok(self
            .request::<Vec<Car>>(Method::GET, "/cars", None)
            .await?
            .unwrap_or_default())
    }

    async fn get_car(&self, id: i64) -> ApiResult<Car> {
        let path = format!("/cars/{id}");
        let (status, car) = self.exchange::<Car>(Method::GET, &path, None).await?;
        car.ok_or(ApiError::EmptyBody { status })
    }

    async fn create_car(&self, payload: &CarCreate) -> ApiResult<Option<Car>> {
        let body = encode(payload)?;
        // TODO: drop the `/cars` fallback once every deployed backend serves `POST /car`.
        with_not_found_fallback(
            "create_car",
            self.request::<Car>(Method::POST, "/car", Some(body.clone())),
            move || self.request::<Car>(Method::POST, "/cars", Some(body)),
        )
        .await
    }

    async fn delete_car(&self, id: i64) -> ApiResult<()> {
        let path = format!("/cars/{id}");
        self.send(Method::DELETE, &path, None).await.map(|_| ())
    }

    async fn list_service_history(&self, car_id: i64) -> ApiResult<Vec<ServiceRecord>> {
        let primary = format!("/cars/{car_id}/service-history");
        let secondary = format!("/cars/{car_id}/service-records");
        let secondary = secondary.as_str();
        let records = with_not_found_fallback(
            "list_service_history",
            self.request::<Vec<ServiceRecord>>(Method::GET, &primary, None),
            move || self.request::<Vec<ServiceRecord>>(Method::GET, secondary, None),
        )
        .await?;
        Ok(records.unwrap_or_default())
    }

    async fn create_service_record(
        &self,
        car_id: i64,
        payload: &ServiceRecordCreate,
    ) -> ApiResult<Option<ServiceRecord>> {
        let path = format!("/cars/{car_id}/service-records");
        self.request::<ServiceRecord>(Method::POST, &path, Some(encode(payload)?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let client = ApiClient::from_base_url(Some("http://fleet.local:3000/"));
        assert_eq!(client.base().as_str(), "http://fleet.local:3000/api");

        let client = ApiClient::from_base_url(None);
        assert_eq!(client.base().as_str(), "http://localhost:3000/api");
    }

    #[tokio::test]
    async fn test_transport_failure_is_typed() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = ApiClient::from_base_url(Some("http://127.0.0.1:9"));
        let err = client.list_cars().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(err.user_message("Failed to load cars"), "Failed to load cars");
    }
}
