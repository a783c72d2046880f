//! Validation gate
//!
//! Pure checks applied to caller-supplied arguments before any request is
//! built. A failure here is always `InvalidParameter` with
//! `ParameterSource::Client`, and nothing is sent to the server.

use crate::error::{CatalogError, Result};
use serde_json::Value;
use uuid::Uuid;

/// Page size used when the client configuration does not set one
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 1000;

/// Paging window actually sent to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start_from: u32,
    pub page_size: u32,
}

impl PageWindow {
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("startFrom", self.start_from.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

/// Values that travel as a path segment cannot be `.` or `..`; URL parsing
/// would resolve them against the surrounding path.
fn reject_dot_segment(value: &str, parameter: &str, operation: &str) -> Result<()> {
    if value == "." || value == ".." {
        return Err(CatalogError::invalid(
            operation,
            parameter,
            format!("'{}' cannot be used as a path segment", value),
        ));
    }
    Ok(())
}

pub fn validate_user_id(user_id: &str, operation: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(CatalogError::invalid(operation, "userId", "must not be empty"));
    }
    reject_dot_segment(user_id, "userId", operation)
}

/// GUIDs must be non-empty and parse as a UUID
pub fn validate_guid(guid: &str, parameter: &str, operation: &str) -> Result<()> {
    if guid.trim().is_empty() {
        return Err(CatalogError::invalid(operation, parameter, "must not be empty"));
    }
    if Uuid::try_parse(guid).is_err() {
        return Err(CatalogError::invalid(
            operation,
            parameter,
            format!("'{}' is not a well-formed GUID", guid),
        ));
    }
    Ok(())
}

/// Names and qualified names must contain something other than whitespace
pub fn validate_name(name: &str, parameter: &str, operation: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::invalid(operation, parameter, "must not be empty"));
    }
    reject_dot_segment(name, parameter, operation)
}

/// A properties object must serialize to a non-empty JSON object
pub fn validate_object(value: &Value, parameter: &str, operation: &str) -> Result<()> {
    match value {
        Value::Object(map) if !map.is_empty() => Ok(()),
        Value::Object(_) => Err(CatalogError::invalid(operation, parameter, "must not be empty")),
        Value::Null => Err(CatalogError::invalid(operation, parameter, "must not be null")),
        _ => Err(CatalogError::invalid(operation, parameter, "must be an object")),
    }
}

pub fn validate_search_string(search_string: &str, parameter: &str, operation: &str) -> Result<()> {
    if search_string.is_empty() {
        return Err(CatalogError::invalid(operation, parameter, "must not be empty"));
    }
    reject_dot_segment(search_string, parameter, operation)
}

/// Validate a paging request and compute the page size to send
///
/// `max_page_size` of zero means the server imposes no bound. A requested
/// page size of zero asks for "as many as allowed" and becomes the maximum;
/// anything above the maximum is clamped down to it.
pub fn validate_paging(
    start_from: i32,
    page_size: i32,
    max_page_size: u32,
    operation: &str,
) -> Result<PageWindow> {
    if start_from < 0 {
        return Err(CatalogError::invalid(
            operation,
            "startFrom",
            format!("must not be negative (was {})", start_from),
        ));
    }
    if page_size < 0 {
        return Err(CatalogError::invalid(
            operation,
            "pageSize",
            format!("must not be negative (was {})", page_size),
        ));
    }

    let requested = page_size as u32;
    let effective = if max_page_size == 0 {
        requested
    } else if requested == 0 || requested > max_page_size {
        max_page_size
    } else {
        requested
    };

    if effective != requested {
        tracing::debug!(
            "{}: page size {} adjusted to {}",
            operation,
            requested,
            effective
        );
    }

    Ok(PageWindow {
        start_from: start_from as u32,
        page_size: effective,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const GUID: &str = "2f0e4b0e-6a57-4c39-9f3a-0d4c8a3e0d11";

    #[test]
    fn test_user_id() {
        assert!(validate_user_id("erinoverview", "findDatabases").is_ok());
        let err = validate_user_id("  ", "findDatabases").unwrap_err();
        assert!(err.is_local());
        assert_eq!(err.operation(), "findDatabases");
    }

    #[test]
    fn test_guid_must_be_uuid() {
        assert!(validate_guid(GUID, "databaseGUID", "getDatabaseByGUID").is_ok());
        assert!(validate_guid("", "databaseGUID", "getDatabaseByGUID").is_err());

        let err = validate_guid("not-a-guid", "databaseGUID", "getDatabaseByGUID").unwrap_err();
        match err {
            CatalogError::InvalidParameter { parameter, .. } => assert_eq!(parameter, "databaseGUID"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_name_rejects_blank() {
        assert!(validate_name("SalesDB", "qualifiedName", "createDatabase").is_ok());
        assert!(validate_name("", "qualifiedName", "createDatabase").is_err());
        assert!(validate_name(" \t", "qualifiedName", "createDatabase").is_err());
    }

    #[test]
    fn test_dot_segments_are_rejected() {
        for value in [".", ".."] {
            let err = validate_user_id(value, "findDatabases").unwrap_err();
            assert!(err.is_local());
            assert!(err.to_string().contains("userId"));
            assert!(validate_name(value, "qualifiedName", "removeDatabase").is_err());
            assert!(validate_search_string(value, "searchString", "findDatabases").is_err());
        }
        assert!(validate_search_string(".*", "searchString", "findDatabases").is_ok());
        assert!(validate_name("...", "name", "getDatabasesByName").is_ok());
        assert!(validate_name("SalesDB..v2", "qualifiedName", "createDatabase").is_ok());
    }

    #[test]
    fn test_object() {
        assert!(validate_object(&json!({"qualifiedName": "x"}), "p", "op").is_ok());
        assert!(validate_object(&json!({}), "p", "op").is_err());
        assert!(validate_object(&Value::Null, "p", "op").is_err());
        assert!(validate_object(&json!("x"), "p", "op").is_err());
    }

    #[test]
    fn test_search_string() {
        assert!(validate_search_string(".*order.*", "searchString", "findDatabaseColumns").is_ok());
        assert!(validate_search_string("", "searchString", "findDatabaseColumns").is_err());
    }

    #[test]
    fn test_paging_clamps_to_maximum() {
        let window = validate_paging(0, 5000, 1000, "findDatabases").unwrap();
        assert_eq!(window.page_size, 1000);

        let window = validate_paging(20, 10, 1000, "findDatabases").unwrap();
        assert_eq!(window, PageWindow { start_from: 20, page_size: 10 });

        let window = validate_paging(0, 0, 1000, "findDatabases").unwrap();
        assert_eq!(window.page_size, 1000);
    }

    #[test]
    fn test_paging_unbounded_maximum() {
        let window = validate_paging(0, 0, 0, "findDatabases").unwrap();
        assert_eq!(window.page_size, 0);
        let window = validate_paging(0, 123_456, 0, "findDatabases").unwrap();
        assert_eq!(window.page_size, 123_456);
    }

    #[test]
    fn test_paging_rejects_negative() {
        let err = validate_paging(-1, 10, 1000, "findDatabases").unwrap_err();
        assert!(err.to_string().contains("startFrom"));
        let err = validate_paging(0, -10, 1000, "findDatabases").unwrap_err();
        assert!(err.to_string().contains("pageSize"));
    }

    #[test]
    fn test_query_pairs() {
        let window = PageWindow { start_from: 3, page_size: 7 };
        let pairs = window.query_pairs();
        assert_eq!(pairs[0], ("startFrom", "3".to_string()));
        assert_eq!(pairs[1], ("pageSize", "7".to_string()));
    }
}
