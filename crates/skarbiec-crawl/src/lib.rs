#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Tree crawling.
//!
//! Provides:
//! - [`ChildLister`] — the listing seam (implemented for `DriveClient`,
//!   mockable in tests)
//! - [`TreeCrawler`] — the depth-bounded walk
//! - [`CrawlEntry`] / [`CrawlResult`] — path-annotated leaves
//! - [`ListError`] / [`CrawlError`] — fault classification

pub mod error;

use std::collections::HashSet;

use async_trait::async_trait;

use skarbiec_client::{DriveClient, FOLDER_MIME_TYPE, FileQuery};
use skarbiec_codec::Record;

pub use error::{CrawlError, ListError};

/// Default bound on container nesting depth.
///
/// The hierarchy is assumed acyclic by the service; the bound is a
/// defensive backstop, not cycle detection.
const DEFAULT_MAX_DEPTH: u32 = 20;

/// The listing seam the crawler walks through.
#[async_trait(?Send)]
pub trait ChildLister {
    /// List the immediate children (files and folders) of `container_id`.
    async fn list_children(&mut self, container_id: &str) -> Result<Vec<Record>, ListError>;
}

#[async_trait(?Send)]
impl ChildLister for DriveClient {
    async fn list_children(&mut self, container_id: &str) -> Result<Vec<Record>, ListError> {
        Ok(self.list_files(&FileQuery::in_folder(container_id)).await?)
    }
}

/// One leaf resource found by a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlEntry {
    /// Slash-joined path from the crawl root to the leaf's immediate
    /// parent container.
    pub path: String,
    /// The leaf resource.
    pub file: Record,
}

/// All leaves found by one walk, in traversal order.
pub type CrawlResult = Vec<CrawlEntry>;

/// Whether any owner entry on the resource is the connected identity.
pub fn owned_by_me(resource: &Record) -> bool {
    resource
        .records("owners")
        .iter()
        .any(|owner| owner.bool_field("me").unwrap_or(false))
}

/// Whether the resource is a folder-like container.
pub fn is_container(resource: &Record) -> bool {
    resource.str_field("mimeType") == Some(FOLDER_MIME_TYPE)
}

struct Frame {
    container_id: String,
    path: String,
    depth: u32,
}

/// Recursively enumerates every leaf reachable from a root container.
///
/// Traversal is depth-first in listing order: a container's leaves are
/// emitted before any of its subfolders are entered, and a subfolder's
/// whole subtree is emitted before its next sibling. By default only
/// containers owned by the connected identity are entered; shared-drive
/// walks use [`TreeCrawler::descend_all`].
pub struct TreeCrawler<L> {
    lister: L,
    max_depth: u32,
    exclude_names: HashSet<String>,
    descend: Box<dyn Fn(&Record) -> bool + Send + Sync>,
}

impl<L: ChildLister + Send> TreeCrawler<L> {
    /// A crawler with the default depth bound and ownership-only descent.
    pub fn new(lister: L) -> Self {
        Self {
            lister,
            max_depth: DEFAULT_MAX_DEPTH,
            exclude_names: HashSet::new(),
            descend: Box::new(owned_by_me),
        }
    }

    /// Bound on container nesting depth below the root.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Container names that are never entered (exact match).
    pub fn with_excluded_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the predicate deciding which containers to descend into.
    pub fn with_descend_filter(
        mut self,
        filter: impl Fn(&Record) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.descend = Box::new(filter);
        self
    }

    /// Descend into every container regardless of ownership.
    pub fn descend_all(self) -> Self {
        self.with_descend_filter(|_| true)
    }

    /// Recover the lister once walking is done.
    pub fn into_inner(self) -> L {
        self.lister
    }

    /// Walk the hierarchy under `root_id`, labelling the root level
    /// `root_label` (the id itself when absent) in result paths.
    ///
    /// A container whose listing is [`ListError::Unavailable`] contributes
    /// no results and is logged; its siblings are unaffected. A
    /// [`ListError::Fatal`] aborts the whole walk.
    pub async fn walk(
        &mut self,
        root_id: &str,
        root_label: Option<&str>,
    ) -> Result<CrawlResult, CrawlError> {
        let mut results = Vec::new();
        let mut stack = vec![Frame {
            container_id: root_id.to_owned(),
            path: root_label.unwrap_or(root_id).to_owned(),
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            tracing::info!(path = %frame.path, depth = frame.depth, "walking container");

            let children = match self.lister.list_children(&frame.container_id).await {
                Ok(children) => children,
                Err(ListError::Unavailable { source }) => {
                    tracing::warn!(
                        path = %frame.path,
                        error = %source,
                        "children unavailable, subtree skipped"
                    );
                    continue;
                }
                Err(ListError::Fatal { source }) => {
                    return Err(CrawlError {
                        path: frame.path,
                        source,
                    });
                }
            };

            let mut containers = Vec::new();
            for child in children {
                if is_container(&child) {
                    containers.push(child);
                } else {
                    results.push(CrawlEntry {
                        path: frame.path.clone(),
                        file: child,
                    });
                }
            }

            // Pushed in reverse so the stack yields containers in listing
            // order.
            for container in containers.into_iter().rev() {
                let name = container.str_field("name").unwrap_or_default().to_owned();

                if !(self.descend)(&container) {
                    tracing::info!(
                        path = %frame.path,
                        container = %name,
                        "skipping container not owned by the identity"
                    );
                    continue;
                }
                if self.exclude_names.contains(&name) {
                    tracing::info!(
                        path = %frame.path,
                        container = %name,
                        "skipping excluded container"
                    );
                    continue;
                }
                if frame.depth >= self.max_depth {
                    tracing::warn!(
                        path = %frame.path,
                        container = %name,
                        max_depth = self.max_depth,
                        "depth bound reached, not descending"
                    );
                    continue;
                }

                stack.push(Frame {
                    container_id: container.str_field("id").unwrap_or_default().to_owned(),
                    path: format!("{}/{name}", frame.path),
                    depth: frame.depth + 1,
                });
            }
        }

        Ok(results)
    }
}
