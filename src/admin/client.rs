//! Admin API client
//!
//! Collection endpoints are offset paged and return [`Accumulated`] results;
//! single-object endpoints return the decoded [`Envelope`].

use crate::config::ClientConfig;
use crate::decode::{decode_envelope, Envelope};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, HttpClient, Transport};
use crate::pagination::{
    default_offset_params, Accumulated, OffsetResolver, OptionPipeline, Paginator,
};
use crate::types::{JsonObject, JsonValue, QueryParams};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Client for the administrative API
///
/// Holds no per-retrieval state; concurrent calls are safe when the
/// transport is.
#[derive(Debug, Clone)]
pub struct AdminClient<T = HttpClient> {
    transport: T,
}

impl AdminClient<HttpClient> {
    /// Build a client with the default HTTP transport
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(HttpClient::from_client_config(config)?))
    }
}

impl<T: Transport> AdminClient<T> {
    /// Wrap a transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Generic operations
    // ========================================================================

    /// Retrieve every item of an offset-paged collection
    ///
    /// Starts from `limit=100&offset=0`; `options` may override either.
    pub async fn list<I>(&self, path: &str, options: &OptionPipeline) -> Result<Accumulated<I>>
    where
        I: DeserializeOwned + Send,
    {
        Paginator::new(&self.transport, path)
            .run_with_options(default_offset_params(), options, &OffsetResolver::<I>::new())
            .await
    }

    /// Retrieve a single object
    pub async fn get_object<O: DeserializeOwned>(&self, path: &str) -> Result<Envelope<O>> {
        let body = self
            .transport
            .send(&ApiRequest::get(path, QueryParams::new()))
            .await?;
        decode_envelope(&body)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// All users
    pub async fn get_users(&self, options: &OptionPipeline) -> Result<Accumulated<JsonObject>> {
        self.list("/admin/v1/users", options).await
    }

    /// One user by id
    pub async fn get_user(&self, user_id: &str) -> Result<Envelope<JsonObject>> {
        self.get_object(&format!("/admin/v1/users/{}", segment(user_id)?))
            .await
    }

    /// Groups a user belongs to
    pub async fn get_user_groups(
        &self,
        user_id: &str,
        options: &OptionPipeline,
    ) -> Result<Accumulated<JsonObject>> {
        self.list(&format!("/admin/v1/users/{}/groups", segment(user_id)?), options)
            .await
    }

    /// Phones associated with a user
    pub async fn get_user_phones(
        &self,
        user_id: &str,
        options: &OptionPipeline,
    ) -> Result<Accumulated<JsonObject>> {
        self.list(&format!("/admin/v1/users/{}/phones", segment(user_id)?), options)
            .await
    }

    /// Hardware tokens associated with a user
    pub async fn get_user_tokens(
        &self,
        user_id: &str,
        options: &OptionPipeline,
    ) -> Result<Accumulated<JsonObject>> {
        self.list(&format!("/admin/v1/users/{}/tokens", segment(user_id)?), options)
            .await
    }

    /// U2F tokens associated with a user
    pub async fn get_user_u2f_tokens(
        &self,
        user_id: &str,
        options: &OptionPipeline,
    ) -> Result<Accumulated<JsonObject>> {
        self.list(
            &format!("/admin/v1/users/{}/u2ftokens", segment(user_id)?),
            options,
        )
        .await
    }

    /// Associate a hardware token with a user
    pub async fn associate_user_token(
        &self,
        user_id: &str,
        token_id: &str,
    ) -> Result<Envelope<JsonValue>> {
        let mut params = QueryParams::new();
        params.insert("token_id".to_string(), token_id.to_string());
        let path = format!("/admin/v1/users/{}/tokens", segment(user_id)?);

        debug!(user_id, token_id, "associating token");
        let body = self.transport.send(&ApiRequest::post(path, params)).await?;
        decode_envelope(&body)
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// All groups
    pub async fn get_groups(&self, options: &OptionPipeline) -> Result<Accumulated<JsonObject>> {
        self.list("/admin/v1/groups", options).await
    }

    /// One group by id
    pub async fn get_group(&self, group_id: &str) -> Result<Envelope<JsonObject>> {
        self.get_object(&format!("/admin/v2/groups/{}", segment(group_id)?))
            .await
    }

    // ========================================================================
    // Phones
    // ========================================================================

    /// All phones
    pub async fn get_phones(&self, options: &OptionPipeline) -> Result<Accumulated<JsonObject>> {
        self.list("/admin/v1/phones", options).await
    }

    /// One phone by id
    pub async fn get_phone(&self, phone_id: &str) -> Result<Envelope<JsonObject>> {
        self.get_object(&format!("/admin/v1/phones/{}", segment(phone_id)?))
            .await
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// All hardware tokens
    pub async fn get_tokens(&self, options: &OptionPipeline) -> Result<Accumulated<JsonObject>> {
        self.list("/admin/v1/tokens", options).await
    }

    /// One hardware token by id
    pub async fn get_token(&self, token_id: &str) -> Result<Envelope<JsonObject>> {
        self.get_object(&format!("/admin/v1/tokens/{}", segment(token_id)?))
            .await
    }

    /// All U2F tokens
    pub async fn get_u2f_tokens(
        &self,
        options: &OptionPipeline,
    ) -> Result<Accumulated<JsonObject>> {
        self.list("/admin/v1/u2ftokens", options).await
    }

    /// One U2F token by registration id
    pub async fn get_u2f_token(&self, registration_id: &str) -> Result<Envelope<JsonObject>> {
        self.get_object(&format!(
            "/admin/v1/u2ftokens/{}",
            segment(registration_id)?
        ))
        .await
    }
}

/// Percent-encode an identifier for use as one path segment
pub(super) fn segment(id: &str) -> Result<String> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(Error::invalid_argument(format!(
            "'{id}' is not a valid identifier"
        )));
    }

    let mut url = Url::parse("http://localhost/")?;
    url.path_segments_mut()
        .map_err(|()| Error::invalid_argument("cannot encode identifier"))?
        .pop_if_empty()
        .push(id);
    Ok(url.path().trim_start_matches('/').to_string())
}
