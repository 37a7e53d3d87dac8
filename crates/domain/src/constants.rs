//! Domain-wide constants

/// Safety margin applied when checking access-token validity.
///
/// A token within this many seconds of its recorded expiry is treated as
/// already expired, so a token cannot expire between the validity check and
/// its use on the wire.
pub const ACCESS_TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;

/// CRM record type used for delivered leads.
pub const CRM_LEAD_RECORD_TYPE: &str = "Leads";

/// CRM record type used for contacts.
pub const CRM_CONTACT_RECORD_TYPE: &str = "Contacts";

/// Default number of pending leads processed per backlog pass.
pub const DEFAULT_SYNC_BATCH_SIZE: usize = 50;

/// Default timeout for outbound HTTP calls, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
