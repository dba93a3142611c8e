//! Row identifier generation.
//!
//! Ids are 24-character hex strings built from four components: the current
//! Unix time in seconds, a once-per-process host fingerprint, a per-process
//! random tag, and an incrementing counter seeded from sub-second time.
//! Practically collision-free for concurrent inserts within one process and
//! across processes on the same host within the same second. Not
//! cryptographically secure, not globally unique, and not sortable by
//! creation order (the time component has only second resolution).

use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

static HOST_FINGERPRINT: OnceLock<u32> = OnceLock::new();
static PROCESS_TAG: OnceLock<u16> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// Generate a fresh row id.
pub fn generate() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let seconds = now.as_secs() as u32;
    let host = host_fingerprint();
    let process = *PROCESS_TAG.get_or_init(|| rand::thread_rng().gen());
    let counter = COUNTER
        .get_or_init(|| AtomicU32::new(now.subsec_nanos()))
        .fetch_add(1, Ordering::Relaxed)
        & 0xff_ffff;

    format!("{seconds:08x}{host:06x}{process:04x}{counter:06x}")
}

/// A 24-bit fingerprint of the host, derived once per process from the host
/// name so that same-host processes agree on it. Falls back to a random
/// value when no host identity is available.
fn host_fingerprint() -> u32 {
    *HOST_FINGERPRINT.get_or_init(|| match host_name() {
        Some(name) => {
            let digest = Sha256::digest(name.as_bytes());
            u32::from_be_bytes([0, digest[0], digest[1], digest[2]])
        }
        None => rand::thread_rng().gen::<u32>() & 0xff_ffff,
    })
}

/// The machine's host name as the kernel reports it. Environment variables
/// are the fallback for platforms without procfs; `HOSTNAME` in particular
/// is a shell variable that most non-interactive processes never see.
fn host_name() -> Option<String> {
    #[cfg(unix)]
    for path in ["/proc/sys/kernel/hostname", "/etc/hostname"] {
        if let Ok(contents) = std::fs::read_to_string(path) {
            let name = contents.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .filter(|name| !name.is_empty())
}
