//! Trip backend client
//!
//! Screens talk to the backend through the `TripApi` trait so they can be
//! driven by an in-memory implementation in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use tracing::debug;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    PaymentDetailsResponse, PaymentQuery, PaymentRecord, SingleTripResponse, TripDetails,
    TripUpdate,
};

pub const GET_SINGLE_TRIP: &str = "trip/get-single-trip";
pub const GET_PAYMENT_DETAILS: &str = "payment/get-trip-payments";
pub const UPDATE_TRIP: &str = "trip/update-trip";

#[async_trait]
pub trait TripApi: Send + Sync {
    async fn trip(&self, token: &str, trip_id: &str) -> Result<TripDetails>;

    /// Payments in backend order (oldest first)
    async fn payments(
        &self,
        token: &str,
        trip_id: &str,
        query: PaymentQuery,
    ) -> Result<Vec<PaymentRecord>>;

    async fn update_trip(&self, token: &str, trip_id: &str, update: &TripUpdate) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct HttpTripApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpTripApi {
    /// `base` must end with a slash so endpoint paths join under it
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str, trip_id: &str) -> Result<Url> {
        self.base
            .join(&format!("{}/{}", path, trip_id))
            .map_err(|err| AppError::Config(format!("invalid endpoint {path}: {err}")))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Api { status, body })
}

#[async_trait]
impl TripApi for HttpTripApi {
    async fn trip(&self, token: &str, trip_id: &str) -> Result<TripDetails> {
        let url = self.endpoint(GET_SINGLE_TRIP, trip_id)?;
        debug!(%url, "fetching trip");

        let response = self.client.get(url).bearer_auth(token).send().await?;
        let body: SingleTripResponse = ensure_success(response).await?.json().await?;
        Ok(body.data)
    }

    async fn payments(
        &self,
        token: &str,
        trip_id: &str,
        query: PaymentQuery,
    ) -> Result<Vec<PaymentRecord>> {
        let url = self.endpoint(GET_PAYMENT_DETAILS, trip_id)?;
        debug!(%url, page = query.page, limit = query.limit, "fetching payments");

        let response = self
            .client
            .get(url)
            .query(&query)
            .bearer_auth(token)
            .send()
            .await?;
        let body: PaymentDetailsResponse = ensure_success(response).await?.json().await?;
        Ok(body.data.payments.docs)
    }

    async fn update_trip(&self, token: &str, trip_id: &str, update: &TripUpdate) -> Result<()> {
        let url = self.endpoint(UPDATE_TRIP, trip_id)?;
        debug!(%url, "updating trip");

        let form = update
            .multipart_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
