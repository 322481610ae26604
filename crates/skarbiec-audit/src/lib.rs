#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Audit orchestration.
//!
//! Provides:
//! - [`AuditRunner`] / [`AuditOptions`] — the per-identity sweep
//! - [`AuditReport`] — the aggregated results
//! - [`report`] — CSV rendering of a report

pub mod error;
pub mod report;

use std::collections::BTreeMap;
use std::path::PathBuf;

use skarbiec_client::{ApiEndpoints, ClientConfig, DirectoryClient, DriveClient};
use skarbiec_codec::Record;
use skarbiec_crawl::{CrawlResult, TreeCrawler};
use skarbiec_gcp_auth::{AuthError, ServiceAccountKey};

pub use error::{Error, Result};

/// How the sweep behaves.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Audit each identity's own drive.
    pub audit_users: bool,
    /// Audit shared drives under domain-admin access.
    pub audit_shared_drives: bool,
    /// Folder names never entered during a walk.
    pub exclude_folders: Vec<String>,
    /// Depth bound for per-identity walks.
    pub max_depth: u32,
    /// Depth bound for shared-drive walks.
    pub shared_drive_max_depth: u32,
    /// Directory for ephemeral credential files.
    pub credential_dir: Option<PathBuf>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            audit_users: true,
            audit_shared_drives: false,
            exclude_folders: vec![".git".to_owned()],
            max_depth: 20,
            shared_drive_max_depth: 30,
            credential_dir: None,
        }
    }
}

/// Everything one run found, keyed for deterministic iteration.
#[derive(Debug, Default)]
pub struct AuditReport {
    /// Per-identity crawl results, keyed by primary email.
    pub user_files: BTreeMap<String, CrawlResult>,
    /// Per-shared-drive crawl results, keyed by drive name.
    pub shared_drive_files: BTreeMap<String, CrawlResult>,
}

/// Runs the audit: one identity at a time, strictly sequential.
///
/// Each identity gets a fresh credential scope for the duration of its
/// crawl, released before the next identity's scope opens. A failure
/// while auditing one identity is logged and the sweep proceeds; only
/// unusable input stops a run before it starts.
pub struct AuditRunner {
    secret: String,
    admin_identity: String,
    options: AuditOptions,
    endpoints: ApiEndpoints,
}

impl AuditRunner {
    /// A runner over the given service-account secret, listing
    /// identities as `admin_identity`.
    pub fn new(secret: impl Into<String>, admin_identity: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            admin_identity: admin_identity.into(),
            options: AuditOptions::default(),
            endpoints: ApiEndpoints::default(),
        }
    }

    /// Override the sweep options.
    pub fn with_options(mut self, options: AuditOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the API endpoints.
    pub fn with_endpoints(mut self, endpoints: ApiEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Run the audit and aggregate the results.
    pub async fn run(&self) -> Result<AuditReport> {
        // Unusable input fails the run up front rather than once per
        // identity.
        ServiceAccountKey::parse(&self.secret)?;
        if self.admin_identity.is_empty() {
            return Err(Error::Auth(AuthError::MissingIdentity));
        }

        let mut report = AuditReport::default();

        if self.options.audit_users {
            self.audit_user_drives(&mut report).await;
        } else {
            tracing::info!("skipping audit of user drives");
        }

        if self.options.audit_shared_drives {
            self.audit_shared_drives(&mut report).await;
        } else {
            tracing::info!("skipping audit of shared drives");
        }

        Ok(report)
    }

    async fn audit_user_drives(&self, report: &mut AuditReport) {
        tracing::info!("beginning drive audit of user drives");

        let identities = match self.list_identities().await {
            Ok(identities) => identities,
            Err(error) => {
                tracing::error!(%error, "failed to list identities");
                return;
            }
        };

        for identity in identities {
            let Some(email) = identity.str_field("primaryEmail").map(str::to_owned) else {
                continue;
            };
            match self.crawl_user_drive(&email).await {
                Ok(files) if files.is_empty() => {
                    tracing::info!(identity = %email, "no files found in user drive");
                }
                Ok(files) => {
                    tracing::info!(
                        identity = %email,
                        count = files.len(),
                        "completed audit of user drive"
                    );
                    report.user_files.insert(email, files);
                }
                Err(error) => {
                    tracing::error!(identity = %email, %error, "error auditing user drive");
                }
            }
        }
    }

    async fn audit_shared_drives(&self, report: &mut AuditReport) {
        tracing::info!("beginning drive audit of shared drives");

        // Shared drive enumeration only works as the admin identity.
        let mut client = match DriveClient::connect_with(
            &self.secret,
            &self.admin_identity,
            self.client_config(),
        )
        .await
        {
            Ok(client) => client,
            Err(error) => {
                tracing::error!(%error, "failed to connect as the admin identity");
                return;
            }
        };

        let drives = match client.list_shared_drives().await {
            Ok(drives) => drives,
            Err(error) => {
                tracing::error!(%error, "failed to list shared drives");
                client.close();
                return;
            }
        };

        let mut crawler = TreeCrawler::new(client)
            .with_max_depth(self.options.shared_drive_max_depth)
            .with_excluded_names(self.options.exclude_folders.iter().cloned())
            .descend_all();

        for drive in drives {
            let (Some(id), Some(name)) = (drive.str_field("id"), drive.str_field("name"))
            else {
                continue;
            };
            match crawler.walk(id, Some(name)).await {
                Ok(files) if files.is_empty() => {
                    tracing::info!(drive = %name, "no files found in shared drive");
                }
                Ok(files) => {
                    tracing::info!(
                        drive = %name,
                        count = files.len(),
                        "completed audit of shared drive"
                    );
                    report.shared_drive_files.insert(name.to_owned(), files);
                }
                Err(error) => {
                    tracing::error!(drive = %name, %error, "error auditing shared drive");
                }
            }
        }

        crawler.into_inner().close();
    }

    /// List every identity under the customer account, as the admin.
    async fn list_identities(&self) -> Result<Vec<Record>> {
        let mut client = DirectoryClient::connect_with(
            &self.secret,
            &self.admin_identity,
            self.client_config(),
        )
        .await?;
        let result = client.list_identities().await;
        client.close();
        Ok(result?)
    }

    /// Crawl one identity's drive under a scope opened just for it.
    async fn crawl_user_drive(&self, identity: &str) -> Result<CrawlResult> {
        let client =
            DriveClient::connect_with(&self.secret, identity, self.client_config()).await?;
        let mut crawler = TreeCrawler::new(client)
            .with_max_depth(self.options.max_depth)
            .with_excluded_names(self.options.exclude_folders.iter().cloned());
        let result = crawler.walk("root", None).await;
        // Release the scope before the next identity's opens, success or not.
        crawler.into_inner().close();
        Ok(result?)
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoints: self.endpoints.clone(),
            credential_dir: self.options.credential_dir.clone(),
        }
    }
}
