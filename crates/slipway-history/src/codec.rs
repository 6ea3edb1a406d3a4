//! History blob codec.
//!
//! The history persists as one YAML document per release name, stored as
//! an opaque blob through the cluster port. Encoding is structural over
//! the full ordered sequence; `decode(encode(h)) == h` holds for every
//! history, including ordering.

use crate::error::{HistoryError, HistoryResult};
use crate::history::ReleaseHistory;

pub fn encode(history: &ReleaseHistory) -> HistoryResult<String> {
    serde_yaml::to_string(history).map_err(HistoryError::Encode)
}

/// Decode a persisted blob. A blank document decodes to the empty
/// history; a release name that was never deployed has no blob at all,
/// which callers map to the same thing.
pub fn decode(body: &str) -> HistoryResult<ReleaseHistory> {
    if body.trim().is_empty() {
        return Ok(ReleaseHistory::new());
    }
    serde_yaml::from_str(body).map_err(HistoryError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorTag, ReleaseStatus};
    use slipway_core::ResourceRef;

    fn deployment(name: &str) -> ResourceRef {
        ResourceRef::new("Deployment", name, "default")
    }

    #[test]
    fn roundtrip_preserves_order_and_fields() {
        let mut history = ReleaseHistory::new();
        history.create_new_release(vec![
            deployment("nginx-blue"),
            ResourceRef::new("Service", "nginx", "default"),
        ]);
        history.set_status_of_latest(ReleaseStatus::Succeeded).unwrap();
        history.set_color_of_latest(ColorTag::Primary).unwrap();
        history.set_content_hash_of_latest("deadbeef").unwrap();
        history.create_new_release(vec![deployment("nginx-green")]);

        let body = encode(&history).unwrap();
        let decoded = decode(&body).unwrap();

        assert_eq!(decoded, history);
        let numbers: Vec<u64> = decoded.iter().map(|r| r.number).collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[test]
    fn roundtrip_of_empty_history() {
        let history = ReleaseHistory::new();
        let body = encode(&history).unwrap();
        assert_eq!(decode(&body).unwrap(), history);
    }

    #[test]
    fn blank_document_decodes_to_empty() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("   \n").unwrap().is_empty());
    }

    #[test]
    fn garbage_document_is_a_decode_error() {
        let result = decode("releases: [not, a, release]");
        assert!(matches!(result, Err(HistoryError::Decode(_))));
    }

    #[test]
    fn optional_fields_survive_absence() {
        let mut history = ReleaseHistory::new();
        history.create_new_release(vec![deployment("nginx")]);

        let body = encode(&history).unwrap();
        let decoded = decode(&body).unwrap();

        let release = decoded.latest().unwrap();
        assert!(release.color_tag.is_none());
        assert!(release.content_hash.is_none());
    }
}
