//! Document id generation
//!
//! Ids look like `doc_<unix millis>_<uuid v4 hex>`. The millisecond prefix
//! keeps ids roughly time-ordered for humans; the 122 random bits make a
//! collision inside one collection practically impossible. The store still
//! checks and reports `DocumentExists` if one ever happens.

use chrono::Utc;
use uuid::Uuid;

/// Prefix of every generated document id
pub const GENERATED_ID_PREFIX: &str = "doc_";

/// Generate a fresh document id
pub fn generate_document_id() -> String {
    format!(
        "{}{}_{}",
        GENERATED_ID_PREFIX,
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
