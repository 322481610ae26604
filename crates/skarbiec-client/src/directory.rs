//! Directory API client.

use std::sync::Arc;

use skarbiec_codec::Record;
use skarbiec_gcp_auth::{
    CredentialScope, DIRECTORY_READONLY_SCOPE, DRIVE_READONLY_SCOPE,
};

use crate::error::Result;
use crate::executor::Executor;
use crate::paginate::{Page, drain_pages};
use crate::request::{ApiRequest, HttpTransport};
use crate::schemas::DirectorySchemas;
use crate::ClientConfig;

/// Client for the directory user listing API.
///
/// Independent of [`crate::DriveClient`]; the two share the credential
/// and execution machinery by composition only.
pub struct DirectoryClient {
    scope: CredentialScope,
    executor: Executor,
    schemas: DirectorySchemas,
    base_url: String,
}

impl DirectoryClient {
    /// Connect to the production endpoints as `identity`.
    pub async fn connect(secret: &str, identity: &str) -> Result<Self> {
        Self::connect_with(secret, identity, ClientConfig::default()).await
    }

    /// Connect with explicit endpoints / credential directory.
    pub async fn connect_with(
        secret: &str,
        identity: &str,
        config: ClientConfig,
    ) -> Result<Self> {
        let mut scope = CredentialScope::new(
            secret,
            &[DIRECTORY_READONLY_SCOPE, DRIVE_READONLY_SCOPE],
        )?;
        if let Some(dir) = config.credential_dir {
            scope = scope.with_workdir(dir);
        }
        scope.connect(Some(identity)).await?;
        Ok(Self {
            scope,
            executor: Executor::new(Arc::new(HttpTransport::new())),
            schemas: DirectorySchemas::new(),
            base_url: config.endpoints.directory_base,
        })
    }

    /// The identity this client executes as.
    pub fn identity(&self) -> Option<&str> {
        self.scope.identity()
    }

    /// Release the credential scope.
    pub fn close(&mut self) {
        self.scope.close();
    }

    /// List every identity under the customer account, fully draining
    /// pagination.
    pub async fn list_identities(&mut self) -> Result<Vec<Record>> {
        let url = format!("{}/users", self.base_url);
        drain_pages(async |token: Option<String>| {
            let bearer = self.scope.ensure_connected().await?;
            let request = match token {
                Some(token) => ApiRequest::new(&url).with_param("pageToken", token),
                None => ApiRequest::new(&url).with_param("customer", "my_customer"),
            };
            let payload = self.executor.execute(&request, &bearer).await?;
            let page = self.schemas.user_list.decode(&payload)?;
            let next_token = page.str_field("nextPageToken").map(str::to_owned);
            Ok(Page {
                items: page.records("users").to_vec(),
                has_more: next_token.is_some(),
                next_token,
            })
        })
        .await
    }
}
