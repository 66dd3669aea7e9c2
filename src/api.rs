//! Belancer admin API client.
//!
//! Every list endpoint takes `page` and `limit` query parameters and responds
//! with `{ total, limit, <items-key>: [...] }`, where the items key depends on
//! the collection.

use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::AuthContext,
    logging::{log_request, log_response},
    pagination::{Page, PageSource},
};

/// The paged collections exposed by the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// Wallet transactions: deposits, withdrawals and payouts.
    Transactions,
    /// Withdrawal requests awaiting or past review.
    Withdrawals,
    /// Disputes raised between clients and freelancers.
    Disputes,
    /// Freelancer applications to gigs and projects.
    Applications,
    /// Gigs offered by freelancers.
    Gigs,
    /// Projects posted by clients.
    Projects,
    /// Registered users.
    Users,
    /// Identity verification (EKYC) submissions.
    Ekyc,
}

impl Collection {
    /// The endpoint path relative to the API base.
    pub fn path(self) -> &'static str {
        match self {
            Self::Transactions => "/transactions",
            Self::Withdrawals => "/withdrawals",
            Self::Disputes => "/disputes",
            Self::Applications => "/applications",
            Self::Gigs => "/gigs",
            Self::Projects => "/projects",
            Self::Users => "/users",
            Self::Ekyc => "/ekyc",
        }
    }

    /// The key holding the items array in a list response.
    pub fn items_key(self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Withdrawals => "withdrawals",
            Self::Disputes => "disputes",
            Self::Applications => "applications",
            Self::Gigs => "gigs",
            Self::Projects => "projects",
            Self::Users => "users",
            Self::Ekyc => "ekyc",
        }
    }
}

/// Async client for the admin API.
///
/// Requests carry the bearer token from the [AuthContext] the client was built
/// with. There are no retries and no request timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
    auth: AuthContext,
}

impl ApiClient {
    /// Create a client for the API at `api_base`, e.g. "https://api.belancer.com/api".
    ///
    /// # Errors
    /// Returns [Error::Network] if the HTTP client could not be built.
    pub fn new(api_base: &str, auth: AuthContext) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(format!("belancer-admin/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
            auth,
        })
    }

    /// The authentication context requests are made with.
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Fetch one page of `collection`.
    ///
    /// # Errors
    /// - [Error::NotAuthenticated] or [Error::TokenExpired] before any request
    ///   is sent if there is no usable token.
    /// - [Error::Network] if the request fails in transit.
    /// - [Error::Http] if the API responds with a non-success status.
    /// - [Error::Parse] if the body is not the expected JSON shape.
    pub async fn fetch_page<T>(
        &self,
        collection: Collection,
        page: u64,
        limit: u64,
    ) -> Result<Page<T>, Error>
    where
        T: DeserializeOwned,
    {
        let token = self.auth.bearer_token(OffsetDateTime::now_utc())?;
        let url = format!("{}{}", self.api_base, collection.path());
        let query = [("page", page), ("limit", limit)];

        log_request(&Method::GET, &url, &query);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log_response(status.as_u16(), &body);

        if !status.is_success() {
            tracing::error!("{url} responded with {status}");
            return Err(Error::Http(status.as_u16(), body));
        }

        parse_page(&body, collection.items_key())
    }

    /// A [PageSource] over `collection`, for use with
    /// [fetch_all](crate::pagination::fetch_all).
    pub fn collection<T>(&self, collection: Collection) -> CollectionSource<'_, T> {
        CollectionSource {
            client: self,
            collection,
            item_type: PhantomData,
        }
    }
}

/// Serves the pages of one collection through an [ApiClient].
#[derive(Debug)]
pub struct CollectionSource<'a, T> {
    client: &'a ApiClient,
    collection: Collection,
    item_type: PhantomData<fn() -> T>,
}

impl<T> PageSource<T> for CollectionSource<'_, T>
where
    T: DeserializeOwned + Send,
{
    async fn fetch_page(&self, page: u64, limit: u64) -> Result<Page<T>, Error> {
        self.client.fetch_page(self.collection, page, limit).await
    }
}

/// Parse a list response body.
///
/// Missing paging fields are read as zero and a missing or null items array as
/// an empty page. `total` and `limit` may also be numeric strings.
fn parse_page<T>(body: &str, items_key: &str) -> Result<Page<T>, Error>
where
    T: DeserializeOwned,
{
    let mut json: Value = serde_json::from_str(body)?;

    let total = read_count(&json["total"]);
    let limit = read_count(&json["limit"]);
    let items = match json.get_mut(items_key).map(Value::take) {
        None | Some(Value::Null) => Vec::new(),
        Some(items) => serde_json::from_value(items)?,
    };

    Ok(Page {
        total,
        limit,
        items,
    })
}

fn read_count(value: &Value) -> u64 {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|text| text.trim().parse().ok()))
        .unwrap_or(0)
}
