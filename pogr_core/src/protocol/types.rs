/**
 * Payload types sent to the intake service.
 *
 * Every submission endpoint takes a JSON object with endpoint-specific
 * named fields. Free-form values (`data`, `event_data`, `metrics`,
 * `settings`) are plain `serde_json::Value`s so callers can pass any
 * JSON-shaped data without an extra type layer.
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::constants::VALID_TAGS;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/**
 * Optional identity attributes attached to a submission.
 *
 * None of the identifiers is required. Unset fields are omitted from
 * the JSON entirely, so an empty `Tags` serializes to `{}`.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steam_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitch_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub association_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pogr_game_session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xbox_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battlenet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pogr_player_id: Option<String>,

    /// Replaces the server-side receive timestamp for this submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_timestamp: Option<String>,
}

impl Tags {
    /**
     * Sets a tag by its wire name.
     *
     * Returns `false` (and leaves the tags untouched) when `key` is not
     * one of the recognised tag names.
     */
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.slot_mut(key) {
            Some(slot) => {
                *slot = Some(value.into());
                true
            }
            None => false,
        }
    }

    /// Builder-style variant of [`Tags::set`]; unknown keys are ignored.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value of a tag by its wire name.
    pub fn get(&self, key: &str) -> Option<&str> {
        let slot = match key {
            "discord_id" => &self.discord_id,
            "steam_id" => &self.steam_id,
            "twitch_id" => &self.twitch_id,
            "association_id" => &self.association_id,
            "pogr_game_session" => &self.pogr_game_session,
            "xbox_id" => &self.xbox_id,
            "battlenet_id" => &self.battlenet_id,
            "twitter_id" => &self.twitter_id,
            "linkedin_id" => &self.linkedin_id,
            "pogr_player_id" => &self.pogr_player_id,
            "override_timestamp" => &self.override_timestamp,
            _ => return None,
        };
        slot.as_deref()
    }

    /// `true` when no tag is set.
    pub fn is_empty(&self) -> bool {
        VALID_TAGS.iter().all(|key| self.get(key).is_none())
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        let slot = match key {
            "discord_id" => &mut self.discord_id,
            "steam_id" => &mut self.steam_id,
            "twitch_id" => &mut self.twitch_id,
            "association_id" => &mut self.association_id,
            "pogr_game_session" => &mut self.pogr_game_session,
            "xbox_id" => &mut self.xbox_id,
            "battlenet_id" => &mut self.battlenet_id,
            "twitter_id" => &mut self.twitter_id,
            "linkedin_id" => &mut self.linkedin_id,
            "pogr_player_id" => &mut self.pogr_player_id,
            "override_timestamp" => &mut self.override_timestamp,
            _ => return None,
        };
        Some(slot)
    }
}

/// Returns `true` if `key` is a tag name the intake service recognises.
pub fn validate_tag(key: &str) -> bool {
    VALID_TAGS.contains(&key)
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/**
 * Severity level for log submissions.
 *
 * Serialized as lowercase strings: `"debug"`, `"info"`, `"warn"`,
 * `"error"`, `"fatal"`.
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Submission payloads
// ---------------------------------------------------------------------------

/// Body of `POST /data`. Built internally by `Client::send_data`.
#[derive(Debug, Serialize)]
pub(crate) struct DataPayload<'a> {
    pub data: &'a Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<&'a Tags>,
}

/// Body of the association-id flavour of `POST /init`.
#[derive(Debug, Serialize)]
pub(crate) struct AssociationPayload<'a> {
    pub association_id: &'a str,
}

/**
 * A game event, sent to `POST /event`.
 *
 * `event` names the event, `sub_event` refines it; `event_type`,
 * `event_flag` and `event_key` are free-form classifiers interpreted
 * by the intake service.
 */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event: String,
    pub sub_event: String,
    pub event_type: String,
    pub event_flag: String,
    pub event_key: String,
    pub event_data: Value,
    pub tags: Option<Tags>,
}

/// A structured log line, sent to `POST /logs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub service: String,
    pub environment: String,
    pub severity: Severity,

    #[serde(rename = "type")]
    pub log_type: String,

    pub log: String,
    pub data: Value,
    pub tags: Option<Tags>,
}

/// A batch of named metric values, sent to `POST /metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub service: String,
    pub environment: String,
    pub metrics: Value,
    pub tags: Option<Tags>,
}

/// A host resource sample, sent to `POST /monitor`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorSample {
    /// CPU usage in percent.
    pub cpu_usage: f64,

    /// Resident memory in bytes.
    pub memory_usage: f64,

    pub dlls_loaded: Vec<String>,
    pub settings: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("steam_id"));
        assert!(validate_tag("override_timestamp"));
        assert!(!validate_tag("not_a_real_tag"));
        assert!(!validate_tag(""));
    }

    /**
     * Unknown keys must be refused without touching the existing tags.
     */
    #[test]
    fn test_set_rejects_unknown_key() {
        let mut tags = Tags::default().with("twitch_id", "t-1");
        assert!(!tags.set("bogus", "x"));
        assert_eq!(tags.get("twitch_id"), Some("t-1"));
        assert_eq!(tags.get("bogus"), None);
    }

    #[test]
    fn test_every_valid_tag_is_settable() {
        let mut tags = Tags::default();
        assert!(tags.is_empty());
        for key in VALID_TAGS {
            assert!(tags.set(key, key), "{key} should be settable");
            assert_eq!(tags.get(key), Some(key));
        }
        assert!(!tags.is_empty());
    }

    /**
     * Unset tags are omitted rather than serialized as `null`.
     */
    #[test]
    fn test_tags_omit_unset_fields() {
        let tags = Tags::default().with("steam_id", "765");
        assert_eq!(serde_json::to_value(&tags).unwrap(), json!({"steam_id": "765"}));
    }

    #[test]
    fn test_data_payload_without_tags() {
        let data = json!({"k": "v"});
        let payload = DataPayload { data: &data, tags: None };
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"data": {"k": "v"}}));
    }

    #[test]
    fn test_log_wire_names() {
        let log = Log {
            service: "matchmaker".into(),
            environment: "prod".into(),
            severity: Severity::Warn,
            log_type: "system".into(),
            log: "queue slow".into(),
            data: json!({"depth": 12}),
            tags: None,
        };

        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value["type"], "system");
        assert_eq!(value["severity"], "warn");
        assert!(value.get("log_type").is_none());
    }
}
