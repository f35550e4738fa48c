/**
 * End-to-end walkthrough of the POGR Rust SDK.
 *
 * Reads credentials from the environment (see `pogr::config_from_env`)
 * plus a few demo-only variables, then runs every flow the SDK offers:
 *
 *   POGR_CLIENT_ID / POGR_BUILD_ID      session-based intake
 *   POGR_ACCESS_KEY / POGR_SECRET_KEY   stateless intake
 *   POGR_JWT, POGR_ASSOCIATION_ID,
 *   STEAM_AUTHENTICATION_TICKET, TWITCH_ID
 *
 *   RUST_LOG=pogr_core=debug cargo run -p pogr_example
 */
use std::env;
use std::time::Duration;

use pogr::{json, Client, Config, Event, Log, Metrics, MonitorSample, Severity, Tags};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let base = Config {
        timeout: Some(Duration::from_secs(30)),
        ..pogr::config_from_env()
    };

    /*
     * Session-based intake: client/build keys only, one session per flow.
     */
    let session_client = Client::new(Config {
        access_key: String::new(),
        secret_key: String::new(),
        ..base.clone()
    });
    println!("{}", session_client.print_config());

    if let Some(jwt) = var("POGR_JWT") {
        run_session(&session_client, "jwt", |c| c.init_with_user_jwt(&jwt));
    }
    if let Some(id) = var("POGR_ASSOCIATION_ID") {
        run_session(&session_client, "association", |c| c.init_with_association_id(&id));
    }
    if let Some(ticket) = var("STEAM_AUTHENTICATION_TICKET") {
        run_session(&session_client, "steam", |c| c.init_with_steam_ticket(&ticket));
    }

    /*
     * Stateless intake: access/secret keys, then client/build keys.
     */
    let access_client = Client::new(Config {
        client_key: String::new(),
        build_key: String::new(),
        ..base.clone()
    });
    send_everything(&access_client, "access_key");

    send_everything(&session_client, "client_key");

    println!("[example] Done.");
}

fn run_session(
    client: &Client,
    label: &str,
    init: impl FnOnce(&Client) -> pogr::Result<String>,
) {
    match init(client) {
        Ok(session_id) => println!("[example] {label}: session {session_id}"),
        Err(e) => {
            eprintln!("[example] {label}: init failed: {e}");
            return;
        }
    }

    send_everything(client, label);

    if let Err(e) = client.end_session() {
        eprintln!("[example] {label}: end failed: {e}");
    }
}

fn send_everything(client: &Client, label: &str) {
    let tags = var("TWITCH_ID").map(|id| Tags::default().with("twitch_id", id));

    report(label, "data", client.send_data(&json!({"level": 3, "score": 1200}), tags.as_ref()));

    report(
        label,
        "event",
        client.send_event(&Event {
            event: "match".into(),
            sub_event: "finished".into(),
            event_type: "gameplay".into(),
            event_flag: "ranked".into(),
            event_key: "match-001".into(),
            event_data: json!({"winner": "blue"}),
            tags: tags.clone(),
        }),
    );

    report(
        label,
        "log",
        client.send_log(&Log {
            service: "game-client".into(),
            environment: "dev".into(),
            severity: Severity::Info,
            log_type: "system".into(),
            log: "example log line".into(),
            data: json!({"fps": 144}),
            tags: tags.clone(),
        }),
    );

    report(
        label,
        "metrics",
        client.send_metrics(&Metrics {
            service: "game-client".into(),
            environment: "dev".into(),
            metrics: json!({"frame_time_ms": 6.9}),
            tags,
        }),
    );

    report(
        label,
        "monitor",
        client.send_monitor_data(&MonitorSample {
            cpu_usage: 23.5,
            memory_usage: 512.0 * 1024.0 * 1024.0,
            dlls_loaded: vec!["d3d11.dll".into()],
            settings: json!({"resolution": "2560x1440"}),
        }),
    );
}

fn report(label: &str, what: &str, result: pogr::Result<String>) {
    match result {
        Ok(id) => println!("[example] {label}: {what} stored as {id}"),
        Err(e) => eprintln!("[example] {label}: {what} failed: {e}"),
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
