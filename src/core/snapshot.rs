//! Immutable snapshots of the machine's externally visible state.

use crate::core::Payload;
use serde::Serialize;

/// The machine's externally visible state at one point in time.
///
/// A new snapshot is allocated if and only if the active state identifier
/// actually changes; sends that do not transition hand back the previous
/// `Arc<Snapshot>` unchanged, so consumers using pointer equality for
/// change detection never re-render spuriously.
///
/// `events` lists the event names the current state accepts, in declaration
/// order. `payload` is the payload delivered by the send that produced this
/// snapshot (`None` at construction or when the send carried none).
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub state: String,
    pub events: Vec<String>,
    #[serde(skip)]
    pub payload: Option<Payload>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_without_payload() {
        let snapshot = Snapshot {
            state: "loading".to_string(),
            events: vec!["RESOLVE".to_string(), "ERROR".to_string()],
            payload: Some(Payload::new(42u32)),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "loading");
        assert_eq!(json["events"][0], "RESOLVE");
        assert!(json.get("payload").is_none());
    }
}
