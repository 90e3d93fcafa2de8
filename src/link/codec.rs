//! Link codec
//!
//! `#guest=<percent-encoded JSON>` encoding and decoding.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fragment marker that selects the guest view
pub const GUEST_MARKER: &str = "#guest=";

/// Identity of one invited guest, carried inside the link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestLink {
    /// Guest's display name
    pub name: String,
    /// Creation time in epoch millis plus random jitter. Advisory only.
    pub id: i64,
    /// Day the link was generated
    pub date: NaiveDate,
}

/// A generated invitation link
#[derive(Debug, Clone, Serialize)]
pub struct InviteLink {
    pub url: String,
    pub guest: GuestLink,
}

/// Reasons a link cannot be produced or read
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Please enter a guest name to create the invitation.")]
    EmptyName,

    #[error("URL has no guest fragment")]
    MissingFragment,

    #[error("Guest fragment is empty")]
    EmptyPayload,

    #[error("Guest fragment is not valid percent-encoding: {0}")]
    Encoding(String),

    #[error("Guest fragment is not a valid guest record: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Builds and reads guest links relative to the page's base URL
#[derive(Debug, Clone)]
pub struct LinkCodec {
    base_url: String,
}

impl LinkCodec {
    /// Create a codec for the given page URL. Any fragment is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if let Some(idx) = base_url.find('#') {
            base_url.truncate(idx);
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a personalized link for `name`
    pub fn encode(&self, name: &str) -> Result<InviteLink, LinkError> {
        self.encode_with(name, Utc::now(), &mut rand::thread_rng())
    }

    /// Generate a link with an explicit clock and random source
    pub fn encode_with<R: Rng>(
        &self,
        name: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<InviteLink, LinkError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LinkError::EmptyName);
        }

        let guest = GuestLink {
            name: name.to_string(),
            id: now.timestamp_millis() + rng.gen_range(0..=999),
            date: now.date_naive(),
        };

        let json = serde_json::to_string(&guest)?;
        let url = format!(
            "{}{}{}",
            self.base_url,
            GUEST_MARKER,
            urlencoding::encode(&json)
        );

        tracing::debug!(guest = %guest.name, id = guest.id, "Generated invitation link");

        Ok(InviteLink { url, guest })
    }

    /// Read the guest out of a link, logging and returning `None` on any
    /// malformed or tampered fragment.
    pub fn decode(&self, url: &str) -> Option<GuestLink> {
        match self.try_decode(url) {
            Ok(guest) => Some(guest),
            Err(LinkError::MissingFragment) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Error parsing guest data");
                None
            }
        }
    }

    /// Read the guest out of a link, reporting why it failed
    pub fn try_decode(&self, url: &str) -> Result<GuestLink, LinkError> {
        let (_, encoded) = url
            .split_once(GUEST_MARKER)
            .ok_or(LinkError::MissingFragment)?;

        if encoded.is_empty() {
            return Err(LinkError::EmptyPayload);
        }

        let json = urlencoding::decode(encoded).map_err(|e| LinkError::Encoding(e.to_string()))?;
        let guest: GuestLink = serde_json::from_str(&json)?;
        Ok(guest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn codec() -> LinkCodec {
        LinkCodec::new("https://party.example.com/invite")
    }

    #[test]
    fn test_round_trip_preserves_name() {
        let codec = codec();
        let names = [
            "Ada",
            "Thandiwe Mokoena",
            "O'Brien & \"Friends\"",
            "Zoë #1 guest=odd",
            "名前 テスト",
            "percent %20 sign",
        ];

        for name in names {
            let link = codec.encode(name).unwrap();
            let decoded = codec.decode(&link.url).unwrap();
            assert_eq!(decoded.name, name);
            assert_eq!(decoded, link.guest);
        }
    }

    #[test]
    fn test_encode_trims_name() {
        let link = codec().encode("  Ada  ").unwrap();
        assert_eq!(link.guest.name, "Ada");
    }

    #[test]
    fn test_encode_rejects_empty_name() {
        assert!(matches!(codec().encode("   "), Err(LinkError::EmptyName)));
    }

    #[test]
    fn test_id_and_date_from_clock() {
        let now = Utc.with_ymd_and_hms(2026, 12, 1, 10, 30, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let link = codec().encode_with("Ada", now, &mut rng).unwrap();

        let base = now.timestamp_millis();
        assert!(link.guest.id >= base && link.guest.id <= base + 999);
        assert_eq!(link.guest.date, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
    }

    #[test]
    fn test_base_url_fragment_is_replaced() {
        let codec = LinkCodec::new("https://party.example.com/#guest=old");
        let link = codec.encode("Ada").unwrap();
        assert!(link.url.starts_with("https://party.example.com/#guest=%7B"));
        assert_eq!(link.url.matches(GUEST_MARKER).count(), 1);
    }

    #[test]
    fn test_decode_without_fragment() {
        assert!(codec().decode("https://party.example.com/invite").is_none());
        assert!(matches!(
            codec().try_decode("https://party.example.com/invite#other"),
            Err(LinkError::MissingFragment)
        ));
    }

    #[test]
    fn test_decode_malformed_fragments() {
        let codec = codec();
        let bad = [
            "https://x/#guest=",
            "https://x/#guest=not-json",
            "https://x/#guest=%7B%22name%22",
            "https://x/#guest=%FF%FE",
            "https://x/#guest=%7B%22name%22%3A1%7D",
            "https://x/#guest=%7B%22name%22%3A%22A%22%2C%22id%22%3A1%2C%22date%22%3A%22yesterday%22%7D",
        ];

        for url in bad {
            assert!(codec.decode(url).is_none(), "expected failure for {}", url);
        }
    }

    #[test]
    fn test_decode_accepts_hand_built_payload() {
        let payload = r#"{"name":"Lerato","id":1767000000123,"date":"2026-12-26"}"#;
        let url = format!("https://x/{}{}", GUEST_MARKER, urlencoding::encode(payload));
        let guest = codec().decode(&url).unwrap();
        assert_eq!(guest.name, "Lerato");
        assert_eq!(guest.id, 1767000000123);
    }
}
