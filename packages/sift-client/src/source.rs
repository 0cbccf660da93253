//! Where list pages come from.

use std::{future::Future, pin::Pin};

use reqwest::{Client, Request};
use serde::de::DeserializeOwned;

use sift_domain::ListResponse;

use crate::{Error, PlannedRequest, Result};

pub const HEADER_CALLER_ID: &str = "X-Sift-Caller-Id";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ListSource<T>
where
	Self: Send + Sync,
{
	fn fetch<'a>(&'a self, request: &'a PlannedRequest) -> BoxFuture<'a, Result<ListResponse<T>>>;
}

/// One list endpoint of the HTTP API, e.g. `http://127.0.0.1:8080` + `/v1/jobs`.
pub struct HttpListSource {
	client: Client,
	url: String,
	caller_id: Option<String>,
}
impl HttpListSource {
	pub fn new(api_base: &str, path: &str) -> Self {
		Self {
			client: Client::new(),
			url: format!("{}{}", api_base.trim_end_matches('/'), path),
			caller_id: None,
		}
	}

	pub fn with_client(mut self, client: Client) -> Self {
		self.client = client;

		self
	}

	/// Sends the caller header on every request. Blank ids are treated as anonymous.
	pub fn with_caller(mut self, caller_id: impl Into<String>) -> Self {
		let caller_id = caller_id.into();

		self.caller_id = if caller_id.trim().is_empty() { None } else { Some(caller_id) };

		self
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// `GET {url}?{params}` with the caller header when one is set.
	pub fn build_request(&self, request: &PlannedRequest) -> Result<Request> {
		let mut builder = self.client.get(&self.url).query(&request.params.to_query());

		if let Some(caller_id) = &self.caller_id {
			builder = builder.header(HEADER_CALLER_ID, caller_id.as_str());
		}

		Ok(builder.build()?)
	}

	async fn get<T>(&self, request: &PlannedRequest) -> Result<ListResponse<T>>
	where
		T: DeserializeOwned,
	{
		let response = self.client.execute(self.build_request(request)?).await?;
		let status = response.status();
		let body = response.bytes().await?;

		if !status.is_success() {
			return Err(Error::Status {
				status: status.as_u16(),
				body: String::from_utf8_lossy(&body).into_owned(),
			});
		}

		Ok(serde_json::from_slice(&body)?)
	}
}

impl<T> ListSource<T> for HttpListSource
where
	T: DeserializeOwned + Send + 'static,
{
	fn fetch<'a>(&'a self, request: &'a PlannedRequest) -> BoxFuture<'a, Result<ListResponse<T>>> {
		Box::pin(self.get(request))
	}
}
