//! Drive API client.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use skarbiec_codec::Record;
use skarbiec_gcp_auth::{CredentialScope, DRIVE_READONLY_SCOPE};

use crate::error::Result;
use crate::executor::Executor;
use crate::paginate::{Page, drain_pages};
use crate::request::{ApiRequest, HttpTransport};
use crate::ClientConfig;
use crate::schemas::DriveSchemas;

const LIST_FIELDS: &str = "files,nextPageToken,incompleteSearch,kind";

/// Filter for one file listing query.
#[derive(Debug, Clone, Default)]
pub struct FileQuery {
    folder_ids: Vec<String>,
    after: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
}

impl FileQuery {
    /// Files owned by the connected identity, drive-wide.
    pub fn owned() -> Self {
        Self::default()
    }

    /// Immediate children of one folder.
    pub fn in_folder(id: impl Into<String>) -> Self {
        Self {
            folder_ids: vec![id.into()],
            ..Self::default()
        }
    }

    /// Immediate children of any of a set of folders.
    pub fn in_folders<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            folder_ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Only files modified after `bound`.
    pub fn with_after(mut self, bound: DateTime<Utc>) -> Self {
        self.after = Some(bound);
        self
    }

    /// Only files modified before `bound`.
    pub fn with_before(mut self, bound: DateTime<Utc>) -> Self {
        self.before = Some(bound);
        self
    }
}

/// Client for the drive listing API, executing as one delegated identity.
///
/// Holds a [`CredentialScope`] and an [`Executor`] by composition; the
/// directory client is an independent sibling, not a parent class.
pub struct DriveClient {
    scope: CredentialScope,
    executor: Executor,
    schemas: DriveSchemas,
    base_url: String,
}

impl DriveClient {
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
        let mut scope = CredentialScope::new(secret, &[DRIVE_READONLY_SCOPE])?;
        if let Some(dir) = config.credential_dir {
            scope = scope.with_workdir(dir);
        }
        scope.connect(Some(identity)).await?;
        Ok(Self {
            scope,
            executor: Executor::new(Arc::new(HttpTransport::new())),
            schemas: DriveSchemas::new(),
            base_url: config.endpoints.drive_base,
        })
    }

    /// The identity this client executes as.
    pub fn identity(&self) -> Option<&str> {
        self.scope.identity()
    }

    /// The payload codecs this client decodes with.
    pub fn schemas(&self) -> &DriveSchemas {
        &self.schemas
    }

    /// Release the credential scope.
    pub fn close(&mut self) {
        self.scope.close();
    }

    /// List all files matching `query`, fully draining pagination.
    pub async fn list_files(&mut self, query: &FileQuery) -> Result<Vec<Record>> {
        let url = format!("{}/files", self.base_url);
        drain_pages(async |token: Option<String>| {
            let bearer = self.scope.ensure_connected().await?;
            let request = match token {
                // Continuation calls carry the token alone.
                Some(token) => ApiRequest::new(&url).with_param("pageToken", token),
                None => self.first_file_request(&url, query),
            };
            let payload = self.executor.execute(&request, &bearer).await?;
            let page = self.schemas.file_list.decode(&payload)?;
            let items = page.records("files").to_vec();
            tracing::debug!(count = items.len(), "file listing page retrieved");
            let next_token = page.str_field("nextPageToken").map(str::to_owned);
            // The listing reports an incomplete search while more pages
            // remain; token presence alone is not the has-more signal here.
            let has_more = page.bool_field("incompleteSearch").unwrap_or(false);
            Ok(Page {
                items,
                next_token,
                has_more,
            })
        })
        .await
    }

    /// List every shared drive visible under domain-admin access.
    pub async fn list_shared_drives(&mut self) -> Result<Vec<Record>> {
        let url = format!("{}/teamdrives", self.base_url);
        drain_pages(async |token: Option<String>| {
            let bearer = self.scope.ensure_connected().await?;
            let request = match token {
                Some(token) => ApiRequest::new(&url).with_param("pageToken", token),
                None => ApiRequest::new(&url)
                    .with_param("pageSize", "100")
                    .with_param("useDomainAdminAccess", "true"),
            };
            let payload = self.executor.execute(&request, &bearer).await?;
            let page = self.schemas.shared_drive_list.decode(&payload)?;
            let next_token = page.str_field("nextPageToken").map(str::to_owned);
            Ok(Page {
                items: page.records("teamDrives").to_vec(),
                has_more: next_token.is_some(),
                next_token,
            })
        })
        .await
    }

    fn first_file_request(&self, url: &str, query: &FileQuery) -> ApiRequest {
        let q = file_search_expression(self.scope.identity(), query);
        if query.folder_ids.is_empty() {
            ApiRequest::new(url)
                .with_param("includeTeamDriveItems", "false")
                .with_param("supportsTeamDrives", "false")
                .with_param("fields", LIST_FIELDS)
                .with_param("q", q)
        } else {
            ApiRequest::new(url)
                .with_param("includeTeamDriveItems", "true")
                .with_param("supportsTeamDrives", "true")
                .with_param("fields", LIST_FIELDS)
                .with_param("q", q)
        }
    }
}

/// The search expression for one file listing query.
///
/// Always excludes trashed files; restricts to the parent folder set when
/// one is given and to the connected identity's ownership otherwise.
fn file_search_expression(identity: Option<&str>, query: &FileQuery) -> String {
    let mut q = String::from("trashed = false");
    if let Some(after) = &query.after {
        q = format!(
            "modifiedTime > '{}' and {q}",
            after.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }
    if let Some(before) = &query.before {
        q = format!(
            "modifiedTime < '{}' and {q}",
            before.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }
    match query.folder_ids.as_slice() {
        [] => {
            let owner = identity.unwrap_or_default();
            format!("'{owner}' in owners and {q}")
        }
        [folder] => format!("'{folder}' in parents and {q}"),
        folders => {
            let clauses: Vec<String> = folders
                .iter()
                .map(|id| format!("'{id}' in parents"))
                .collect();
            format!("({}) and {q}", clauses.join(" or "))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_owned_query_restricts_by_owner() {
        let q = file_search_expression(Some("alice@example.com"), &FileQuery::owned());
        assert_eq!(q, "'alice@example.com' in owners and trashed = false");
    }

    #[test]
    fn test_folder_query_restricts_by_parent() {
        let q = file_search_expression(Some("alice@example.com"), &FileQuery::in_folder("root"));
        assert_eq!(q, "'root' in parents and trashed = false");
    }

    #[test]
    fn test_folder_set_query_joins_with_or() {
        let q = file_search_expression(None, &FileQuery::in_folders(["a", "b"]));
        assert_eq!(q, "('a' in parents or 'b' in parents) and trashed = false");
    }

    #[test]
    fn test_modified_window_prepends_bounds() {
        let after = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2021, 12, 31, 0, 0, 0).unwrap();
        let query = FileQuery::in_folder("root")
            .with_after(after)
            .with_before(before);
        let q = file_search_expression(None, &query);
        assert_eq!(
            q,
            "'root' in parents and modifiedTime < '2021-12-31T00:00:00Z' \
             and modifiedTime > '2021-01-01T00:00:00Z' and trashed = false"
        );
    }
}
