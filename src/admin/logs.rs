//! Log retrieval
//!
//! v1 endpoints (administrator, telephony) are walked with
//! [`LogWindowResolver`]; the v2 authentication endpoint with
//! [`CompositeCursorResolver`].

use super::client::AdminClient;
use crate::decode::{decode_envelope, Envelope};
use crate::error::Result;
use crate::http::{ApiRequest, Transport};
use crate::logs::{
    epoch_seconds, AdminLog, AuthLog, AuthLogPage, LogRecord, LogWindow, TelephonyLog,
    MINTIME_PARAM,
};
use crate::pagination::{
    Accumulated, CompositeCursorResolver, LogWindowResolver, OptionPipeline, Paginator,
};
use crate::types::QueryParams;
use serde::de::DeserializeOwned;
use tracing::debug;

const ADMIN_LOGS_PATH: &str = "/admin/v1/logs/administrator";
const TELEPHONY_LOGS_PATH: &str = "/admin/v1/logs/telephony";
const AUTH_LOGS_PATH: &str = "/admin/v2/logs/authentication";

impl<T: Transport> AdminClient<T> {
    /// Administrator action logs within `window`
    ///
    /// Only `mintime` (epoch seconds) is sent; `window.max_time` bounds how
    /// far pagination advances.
    pub async fn get_admin_logs(
        &self,
        window: LogWindow,
        options: &OptionPipeline,
    ) -> Result<Accumulated<AdminLog>> {
        self.v1_logs(ADMIN_LOGS_PATH, window, options).await
    }

    /// Telephony credit usage logs within `window`
    pub async fn get_telephony_logs(
        &self,
        window: LogWindow,
        options: &OptionPipeline,
    ) -> Result<Accumulated<TelephonyLog>> {
        self.v1_logs(TELEPHONY_LOGS_PATH, window, options).await
    }

    /// One page of authentication logs
    ///
    /// `mintime`/`maxtime` are sent in epoch milliseconds. Resume from a
    /// previous page by adding its [`crate::logs::CursorMetadata::next_page_option`]
    /// to `options`.
    pub async fn get_auth_logs_page(
        &self,
        window: LogWindow,
        options: &OptionPipeline,
    ) -> Result<Envelope<AuthLogPage>> {
        let params = auth_log_params(window, options);
        let body = self
            .transport()
            .send(&ApiRequest::get(AUTH_LOGS_PATH, params))
            .await?;
        decode_envelope(&body)
    }

    /// Every authentication log within `window`, following the server cursor
    pub async fn get_auth_logs(
        &self,
        window: LogWindow,
        options: &OptionPipeline,
    ) -> Result<Accumulated<AuthLog>> {
        let params = auth_log_params(window, options);
        Paginator::new(self.transport(), AUTH_LOGS_PATH)
            .run(params, &CompositeCursorResolver)
            .await
    }

    async fn v1_logs<L>(
        &self,
        path: &str,
        window: LogWindow,
        options: &OptionPipeline,
    ) -> Result<Accumulated<L>>
    where
        L: LogRecord + DeserializeOwned + Send,
    {
        let mut params = QueryParams::new();
        params.insert(MINTIME_PARAM.to_string(), epoch_seconds(window.min_time));

        debug!(
            path,
            mintime = %window.min_time,
            maxtime = %window.max_time,
            "retrieving v1 logs"
        );
        Paginator::new(self.transport(), path)
            .run_with_options(
                params,
                options,
                &LogWindowResolver::<L>::new(window.max_time),
            )
            .await
    }
}

fn auth_log_params(window: LogWindow, options: &OptionPipeline) -> QueryParams {
    let mut params = QueryParams::new();
    window.write_millis(&mut params);
    options.apply(&mut params);
    params
}
