/*!
 * Protocol layer: wire names and payload shapes.
 *
 * Everything related to *what* we send to the intake service:
 * - `constants`: header names, endpoint paths, recognised tag keys
 * - `types`: tags, severity, and the per-endpoint payloads
 * - `envelope`: the `{success, error, payload}` response wrapper
 */

pub mod constants;
pub mod envelope;
pub mod types;
