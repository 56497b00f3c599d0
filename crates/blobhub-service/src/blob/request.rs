//! Request payloads accepted by the blob store.

use serde::{Deserialize, Serialize};

use blobhub_core::types::AppId;

/// Store a blob. `data` is the standard base64 encoding of the blob bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobPutRequest {
    /// Owning application.
    pub app_id: AppId,
    /// Content tag distinguishing blob versions within the application.
    pub etag: String,
    /// Base64-encoded blob content.
    pub data: String,
}

/// Fetch a blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobGetRequest {
    /// Owning application.
    pub app_id: AppId,
    /// Content tag of the blob.
    pub etag: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_request_accepts_string_app_id() {
        let req: BlobPutRequest =
            serde_json::from_str(r#"{"appId":"0042","etag":"abc","data":"AAEC"}"#).unwrap();
        assert_eq!(req.app_id, AppId::new(42));
        assert_eq!(req.etag, "abc");
    }

    #[test]
    fn test_get_request_rejects_malformed_app_id() {
        let res = serde_json::from_str::<BlobGetRequest>(r#"{"appId":"x1","etag":"abc"}"#);
        assert!(res.is_err());
    }
}
