//! Page Router
//!
//! Picks which of the two views a page load shows. The decision is made
//! once from the URL; changing views means loading a different URL.
//!
//! | URL                          | View      | Notice |
//! |------------------------------|-----------|--------|
//! | no `#guest=`                 | Generator | none   |
//! | `#guest=` + valid payload    | Guest     | none   |
//! | `#guest=` + damaged payload  | Generator | shown  |

use serde::Serialize;

use crate::decorations::{Decoration, Scene};
use crate::link::{GuestLink, LinkCodec, LinkError};

pub const DAMAGED_LINK_NOTICE: &str =
    "This invitation link looks damaged or incomplete. Please ask your host to send it again.";

/// The active view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Host view: create links, open the tracker
    Generator,
    /// Personalized invitation with the RSVP form
    Guest { guest: GuestLink },
}

/// User-visible explanation of a link that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkNotice {
    pub message: String,
    /// Why decoding failed
    pub detail: String,
}

/// Routing decision for one page load
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRoute {
    #[serde(flatten)]
    pub view: View,
    /// Name to prefill into the RSVP form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefill_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<LinkNotice>,
    /// Filled in by the caller that owns the random source
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decorations: Vec<Decoration>,
}

impl PageRoute {
    fn new(view: View, notice: Option<LinkNotice>) -> Self {
        let prefill_name = match &view {
            View::Guest { guest } => Some(guest.name.clone()),
            View::Generator => None,
        };
        Self {
            view,
            prefill_name,
            notice,
            decorations: Vec::new(),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self.view, View::Guest { .. })
    }

    /// Decoration set for the active view
    pub fn scene(&self) -> Scene {
        match self.view {
            View::Guest { .. } => Scene::Invitation,
            View::Generator => Scene::Background,
        }
    }
}

/// Route a page load
pub fn route(url: &str, codec: &LinkCodec) -> PageRoute {
    match codec.try_decode(url) {
        Ok(guest) => {
            tracing::debug!(guest = %guest.name, "Routing to guest invitation");
            PageRoute::new(View::Guest { guest }, None)
        }
        Err(LinkError::MissingFragment) => PageRoute::new(View::Generator, None),
        Err(e) => {
            tracing::warn!(error = %e, "Error parsing guest data, showing generator view");
            PageRoute::new(
                View::Generator,
                Some(LinkNotice {
                    message: DAMAGED_LINK_NOTICE.to_string(),
                    detail: e.to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> LinkCodec {
        LinkCodec::new("https://party.example.com/")
    }

    #[test]
    fn test_plain_url_is_generator() {
        let route = route("https://party.example.com/", &codec());
        assert_eq!(route.view, View::Generator);
        assert!(route.notice.is_none());
        assert!(route.prefill_name.is_none());
        assert_eq!(route.scene(), Scene::Background);
    }

    #[test]
    fn test_guest_link_is_guest_view() {
        let codec = codec();
        let link = codec.encode("Naledi").unwrap();

        let route = route(&link.url, &codec);
        assert!(route.is_guest());
        assert_eq!(route.prefill_name.as_deref(), Some("Naledi"));
        assert_eq!(route.scene(), Scene::Invitation);
        assert!(route.notice.is_none());
    }

    #[test]
    fn test_malformed_fragment_falls_back_with_notice() {
        let codec = codec();
        for url in [
            "https://party.example.com/#guest=",
            "https://party.example.com/#guest=%7Bbroken",
            "https://party.example.com/#guest=%E0%A4%A",
            "https://party.example.com/#guest=%5B1%2C2%5D",
        ] {
            let route = route(url, &codec);
            assert_eq!(route.view, View::Generator, "{}", url);
            let notice = route.notice.expect("notice");
            assert_eq!(notice.message, DAMAGED_LINK_NOTICE);
        }
    }

    #[test]
    fn test_routing_is_deterministic() {
        let codec = codec();
        let link = codec.encode("Naledi").unwrap();
        assert_eq!(route(&link.url, &codec), route(&link.url, &codec));
        assert_ne!(route(&link.url, &codec), route("https://x/", &codec));
    }

    #[test]
    fn test_route_serializes_flat() {
        let json = serde_json::to_value(route("https://x/", &codec())).unwrap();
        assert_eq!(json["view"], "generator");
        assert!(json.get("decorations").is_none());
    }
}
