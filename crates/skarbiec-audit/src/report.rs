//! CSV rendering of audit results.
//!
//! One row per (scope, path, file), with the permission list flattened
//! into three summary columns: user/group grants, domain grants, and
//! "anyone" grants. Deleted grants are filtered out; the discovery
//! visibility flag is rendered `D(...)`.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};

use skarbiec_codec::Record;
use skarbiec_crawl::CrawlResult;

use crate::error::Result;
use crate::AuditReport;

const COLUMNS: [&str; 15] = [
    "", // scope column, named per report kind
    "path",
    "name",
    "mimeType",
    "trashed",
    "webViewLink",
    "createdTime",
    "modifiedTime",
    "owners",
    "lastModifyingUser",
    "shared",
    "viewersCanCopy",
    "usersAndGroups",
    "domains",
    "anyone",
];

/// Render the per-identity report as CSV.
pub fn write_user_report<W: Write>(report: &AuditReport, out: W) -> Result<()> {
    write_rows("User Drive", &report.user_files, out)
}

/// Render the shared-drive report as CSV.
pub fn write_shared_drive_report<W: Write>(report: &AuditReport, out: W) -> Result<()> {
    write_rows("Shared Drive", &report.shared_drive_files, out)
}

/// Default report filename: `<prefix>_permission_report_<unix ts>.csv`.
pub fn default_report_filename(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_permission_report_{}.csv", now.timestamp())
}

fn write_rows<W: Write>(
    scope_column: &str,
    files: &BTreeMap<String, CrawlResult>,
    out: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = COLUMNS.map(str::to_owned);
    header[0] = scope_column.to_owned();
    writer.write_record(&header)?;

    for (scope, entries) in files {
        for entry in entries {
            let file = &entry.file;
            let permissions = file.records("permissions");
            writer.write_record(&[
                scope.clone(),
                entry.path.clone(),
                field(file, "name"),
                field(file, "mimeType"),
                flag(file, "trashed"),
                field(file, "webViewLink"),
                date_column(file.time_field("createdTime")),
                date_column(file.time_field("modifiedTime")),
                owners_column(file),
                last_modified_by(file),
                flag(file, "shared"),
                flag(file, "viewersCanCopyContent"),
                user_permission_column(permissions),
                domain_permission_column(permissions),
                anyone_permission_column(permissions),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn field(file: &Record, name: &str) -> String {
    file.str_field(name).unwrap_or_default().to_owned()
}

fn flag(file: &Record, name: &str) -> String {
    file.bool_field(name).map(|b| b.to_string()).unwrap_or_default()
}

fn date_column(time: Option<&DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn owners_column(file: &Record) -> String {
    let emails: Vec<&str> = file
        .records("owners")
        .iter()
        .filter_map(|owner| owner.str_field("emailAddress"))
        .collect();
    emails.join(",")
}

fn last_modified_by(file: &Record) -> String {
    file.record("lastModifyingUser")
        .and_then(|user| user.str_field("emailAddress"))
        .unwrap_or_default()
        .to_owned()
}

fn live(permission: &&Record) -> bool {
    !permission.bool_field("deleted").unwrap_or(false)
}

fn discovery(permission: &Record) -> String {
    permission
        .bool_field("allowFileDiscovery")
        .map(|b| b.to_string())
        .unwrap_or_else(|| "none".to_owned())
}

/// `user:alice@x:writer,group:eng@x:reader` for user and group grants.
fn user_permission_column(permissions: &[Record]) -> String {
    let grants: Vec<String> = permissions
        .iter()
        .filter(live)
        .filter(|p| matches!(p.str_field("type"), Some("user" | "group")))
        .map(|p| {
            format!(
                "{}:{}:{}",
                p.str_field("type").unwrap_or_default(),
                p.str_field("emailAddress").unwrap_or_default(),
                p.str_field("role").unwrap_or_default(),
            )
        })
        .collect();
    grants.join(",")
}

/// `example.com:reader:D(true)` for domain grants.
fn domain_permission_column(permissions: &[Record]) -> String {
    let grants: Vec<String> = permissions
        .iter()
        .filter(live)
        .filter(|p| p.str_field("type") == Some("domain"))
        .map(|p| {
            format!(
                "{}:{}:D({})",
                p.str_field("domain").unwrap_or_default(),
                p.str_field("role").unwrap_or_default(),
                discovery(p),
            )
        })
        .collect();
    grants.join(",")
}

/// `reader:D(false)` for grants to anyone.
fn anyone_permission_column(permissions: &[Record]) -> String {
    let grants: Vec<String> = permissions
        .iter()
        .filter(live)
        .filter(|p| p.str_field("type") == Some("anyone"))
        .map(|p| format!("{}:D({})", p.str_field("role").unwrap_or_default(), discovery(p)))
        .collect();
    grants.join(",")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use skarbiec_client::DriveSchemas;
    use skarbiec_crawl::CrawlEntry;

    fn sample_report() -> AuditReport {
        let schemas = DriveSchemas::new();
        let file = schemas
            .file
            .decode(&serde_json::json!({
                "id": "f1",
                "name": "plan.txt",
                "mimeType": "text/plain",
                "trashed": false,
                "shared": true,
                "webViewLink": "https://drive.example.com/f1",
                "createdTime": "2019-02-26T10:00:00Z",
                "modifiedTime": "2019-03-01T09:30:00Z",
                "owners": [{"emailAddress": "alice@example.com", "me": true}],
                "lastModifyingUser": {"emailAddress": "bob@example.com"},
                "permissions": [
                    {"id": "p1", "type": "user", "role": "writer",
                     "emailAddress": "bob@example.com"},
                    {"id": "p2", "type": "user", "role": "reader",
                     "emailAddress": "gone@example.com", "deleted": true},
                    {"id": "p3", "type": "domain", "role": "reader",
                     "domain": "example.com", "allowFileDiscovery": true},
                    {"id": "p4", "type": "anyone", "role": "reader",
                     "allowFileDiscovery": false},
                ],
            }))
            .unwrap();

        let mut report = AuditReport::default();
        report.user_files.insert(
            "alice@example.com".to_owned(),
            vec![CrawlEntry {
                path: "root/Plans".to_owned(),
                file,
            }],
        );
        report
    }

    #[test]
    fn test_user_report_renders_original_columns() {
        let mut out = Vec::new();
        write_user_report(&sample_report(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("User Drive,path,name,mimeType,trashed"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("alice@example.com,root/Plans,plan.txt,text/plain,false"));
        assert!(row.contains("2019-02-26"));
        assert!(row.contains("2019-03-01"));
        assert!(row.contains("user:bob@example.com:writer"));
        assert!(row.contains("example.com:reader:D(true)"));
        assert!(row.contains("reader:D(false)"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_deleted_grants_are_filtered() {
        let mut out = Vec::new();
        write_user_report(&sample_report(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("gone@example.com"));
    }

    #[test]
    fn test_shared_drive_report_uses_drive_scope_column() {
        let mut report = sample_report();
        report.shared_drive_files =
            std::mem::take(&mut report.user_files);
        let mut out = Vec::new();
        write_shared_drive_report(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Shared Drive,path,name"));
    }

    #[test]
    fn test_default_report_filename_is_timestamped() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(
            default_report_filename("user", now),
            "user_permission_report_1700000000.csv"
        );
    }

    #[test]
    fn test_empty_report_renders_header_only() {
        let mut out = Vec::new();
        write_user_report(&AuditReport::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
