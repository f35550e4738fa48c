/**
 * SDK-wide constants.
 *
 * Header names, endpoint paths and the recognised tag keys. These are
 * the wire-level names the intake service expects and must not change.
 */

/// Intake host used when `Config::base_url` is left empty.
pub const DEFAULT_BASE_URL: &str = "https://api.pogr.io/v1/intake";

/// SDK version string, derived from the `pogr_core` package version.
pub const SDK_VERSION: &str = concat!("pogr-rust/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Header names
// ---------------------------------------------------------------------------

pub const HEADER_SESSION_ID: &str = "INTAKE_SESSION_ID";
pub const HEADER_ACCESS_KEY: &str = "ACCESS_KEY";
pub const HEADER_SECRET_KEY: &str = "SECRET_KEY";
pub const HEADER_CLIENT_KEY: &str = "POGR_CLIENT";
pub const HEADER_BUILD_KEY: &str = "POGR_BUILD";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

pub const CONTENT_TYPE_JSON: &str = "application/json";

// ---------------------------------------------------------------------------
// Endpoint paths (relative to the base URL)
// ---------------------------------------------------------------------------

pub const PATH_INIT: &str = "/init";
pub const PATH_END: &str = "/end";
pub const PATH_DATA: &str = "/data";
pub const PATH_EVENT: &str = "/event";
pub const PATH_LOGS: &str = "/logs";
pub const PATH_METRICS: &str = "/metrics";
pub const PATH_MONITOR: &str = "/monitor";

/// Query parameter carrying the Steam authentication ticket on `/init`.
pub const QUERY_STEAM_TICKET: &str = "steam_ticket";

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Every tag key the intake service recognises.
pub const VALID_TAGS: [&str; 11] = [
    "steam_id",
    "twitch_id",
    "association_id",
    "pogr_game_session",
    "xbox_id",
    "battlenet_id",
    "twitter_id",
    "linkedin_id",
    "pogr_player_id",
    "discord_id",
    "override_timestamp",
];
