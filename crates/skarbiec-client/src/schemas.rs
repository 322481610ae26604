//! Payload codecs for the two API surfaces.
//!
//! Built once per client and passed by reference wherever decode/encode
//! is needed; there is no global registry. Field names follow the wire
//! payloads verbatim.

use skarbiec_codec::{RecordCodec, Schema, TimestampCodec};

/// MIME type distinguishing folder containers from leaf files.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Codecs for drive payloads.
#[derive(Debug, Clone)]
pub struct DriveSchemas {
    /// A user reference on a file (owners, last modifying user).
    pub user_ref: RecordCodec,
    /// One permission grant on a file.
    pub permission: RecordCodec,
    /// One file or folder.
    pub file: RecordCodec,
    /// A page of the file listing.
    pub file_list: RecordCodec,
    /// One shared drive.
    pub shared_drive: RecordCodec,
    /// A page of the shared drive listing.
    pub shared_drive_list: RecordCodec,
}

impl DriveSchemas {
    /// Build the drive codecs.
    pub fn new() -> Self {
        let user_ref = Schema::new(
            "DriveUserReference",
            &["kind", "displayName", "me", "permissionId", "emailAddress"],
        )
        .build();

        let shared_drive_permission = Schema::new(
            "SharedDrivePermissionDetail",
            &["teamDrivePermissionType", "role", "inheritedFrom", "inherited"],
        )
        .build();

        let permission = Schema::new(
            "DrivePermission",
            &[
                "kind",
                "id",
                "type",
                "emailAddress",
                "domain",
                "role",
                "allowFileDiscovery",
                "displayName",
                "expirationTime",
                "teamDrivePermissionDetails",
                "deleted",
            ],
        )
        .with_nested("teamDrivePermissionDetails", &shared_drive_permission)
        .build();

        let file = Schema::new(
            "DriveFile",
            &[
                "kind",
                "id",
                "name",
                "mimeType",
                "starred",
                "trashed",
                "explicitlyTrashed",
                "parents",
                "version",
                "webContentLink",
                "webViewLink",
                "iconLink",
                "hasThumbnail",
                "viewedByMe",
                "viewedByMeTime",
                "createdTime",
                "modifiedTime",
                "modifiedByMeTime",
                "modifiedByMe",
                "owners",
                "lastModifyingUser",
                "shared",
                "ownedByMe",
                "capabilities",
                "viewersCanCopyContent",
                "writersCanShare",
                "permissions",
                "originalFilename",
                "fullFileExtension",
                "fileExtension",
                "md5Checksum",
                "size",
                "headRevisionId",
            ],
        )
        .with_nested("owners", &user_ref)
        .with_nested("lastModifyingUser", &user_ref)
        .with_nested("permissions", &permission)
        .with_codec("createdTime", TimestampCodec)
        .with_codec("modifiedTime", TimestampCodec)
        .build();

        let file_list = Schema::new(
            "DriveFileList",
            &["files", "nextPageToken", "incompleteSearch", "kind"],
        )
        .with_nested("files", &file)
        .build();

        let restrictions = Schema::new(
            "SharedDriveRestrictions",
            &[
                "adminManagedRestrictions",
                "copyRequiresWriterPermission",
                "domainUsersOnly",
                "teamMembersOnly",
            ],
        )
        .build();

        let shared_drive = Schema::new(
            "SharedDrive",
            &["kind", "id", "name", "createdTime", "restrictions"],
        )
        .with_nested("restrictions", &restrictions)
        .build();

        let shared_drive_list = Schema::new(
            "SharedDriveList",
            &["kind", "nextPageToken", "teamDrives"],
        )
        .with_nested("teamDrives", &shared_drive)
        .build();

        Self {
            user_ref,
            permission,
            file,
            file_list,
            shared_drive,
            shared_drive_list,
        }
    }
}

impl Default for DriveSchemas {
    fn default() -> Self {
        Self::new()
    }
}

/// Codecs for directory payloads.
#[derive(Debug, Clone)]
pub struct DirectorySchemas {
    /// A directory user's structured name.
    pub user_name: RecordCodec,
    /// One directory user.
    pub user: RecordCodec,
    /// A page of the user listing.
    pub user_list: RecordCodec,
}

impl DirectorySchemas {
    /// Build the directory codecs.
    pub fn new() -> Self {
        let user_name = Schema::new(
            "DirectoryUserName",
            &["familyName", "givenName", "fullName"],
        )
        .build();

        let user = Schema::new(
            "DirectoryUser",
            &[
                "agreedToTerms",
                "archived",
                "changePasswordAtNextLogin",
                "creationTime",
                "customerId",
                "emails",
                "address",
                "etag",
                "id",
                "includeInGlobalAddressList",
                "ipWhitelisted",
                "isAdmin",
                "isDelegatedAdmin",
                "isEnforcedIn2Sv",
                "isEnrolledIn2Sv",
                "isMailboxSetup",
                "kind",
                "lastLoginTime",
                "name",
                "orgUnitPath",
                "primaryEmail",
                "suspended",
            ],
        )
        .with_nested("name", &user_name)
        .build();

        let user_list = Schema::new(
            "DirectoryUserList",
            &["etag", "kind", "users", "nextPageToken"],
        )
        .with_nested("users", &user)
        .build();

        Self {
            user_name,
            user,
            user_list,
        }
    }
}

impl Default for DirectorySchemas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_payload_decodes_with_nested_permissions() {
        let schemas = DriveSchemas::new();
        let record = schemas
            .file
            .decode(&json!({
                "id": "f1",
                "name": "report.txt",
                "mimeType": "text/plain",
                "createdTime": "2019-02-26T00:00:01Z",
                "owners": [{"emailAddress": "alice@example.com", "me": true}],
                "permissions": [
                    {"id": "p1", "type": "user", "role": "writer", "emailAddress": "bob@example.com"}
                ],
            }))
            .unwrap();

        assert_eq!(record.str_field("name"), Some("report.txt"));
        assert_eq!(record.records("owners")[0].bool_field("me"), Some(true));
        assert_eq!(record.records("permissions")[0].str_field("role"), Some("writer"));
        assert!(record.time_field("createdTime").is_some());
    }

    #[test]
    fn test_file_timestamps_reencode_exactly() {
        let schemas = DriveSchemas::new();
        let record = schemas
            .file
            .decode(&json!({"id": "f1", "modifiedTime": "2021-06-01T12:30:00Z"}))
            .unwrap();
        let encoded = record.encode().unwrap();
        assert_eq!(encoded["modifiedTime"], json!("2021-06-01T12:30:00Z"));
    }

    #[test]
    fn test_user_list_decodes_nested_users() {
        let schemas = DirectorySchemas::new();
        let record = schemas
            .user_list
            .decode(&json!({
                "kind": "admin#directory#users",
                "users": [
                    {"primaryEmail": "alice@example.com", "name": {"fullName": "Alice A"}},
                    {"primaryEmail": "bob@example.com"},
                ],
                "nextPageToken": "t1",
            }))
            .unwrap();
        let users = record.records("users");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].record("name").unwrap().str_field("fullName"), Some("Alice A"));
        assert_eq!(record.str_field("nextPageToken"), Some("t1"));
    }
}
