//! Reference strings handed back to clients.
//!
//! References are identifiers for follow-up conversations, not security
//! tokens: the date segment makes them easy to file and the random suffix
//! keeps same-day collisions unlikely without any shared counter.

use chrono::{DateTime, Utc};

/// Response body marker for honeypot submissions. The caller sees a normal
/// confirmation shape; nothing is processed or sent.
pub const SPAM_SENTINEL: &str = "SPAM-BLOCKED";

/// Which reference family to mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Booking,
    Enquiry,
}

impl ReferenceKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Booking => "CHS",
            Self::Enquiry => "ENQ",
        }
    }
}

/// Mint a reference like `CHS-20260901-K3QX`. The date segment is `now` in
/// UTC, so references sort by issue day regardless of local clocks.
pub fn generate(kind: ReferenceKind, now: DateTime<Utc>) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    const SUFFIX_LEN: usize = 4;

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    format!("{}-{}-{}", kind.prefix(), now.format("%Y%m%d"), suffix)
}
