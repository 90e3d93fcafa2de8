//! Guest Links
//!
//! Encodes a guest's identity into a shareable URL fragment and reads it
//! back. The fragment is the only state passed from the host's generator
//! view to the guest's invitation view:
//!
//! ```text
//! https://example.com/party#guest=%7B%22name%22%3A%22Ada%22%2C...%7D
//! ```

mod codec;

pub use codec::{GuestLink, InviteLink, LinkCodec, LinkError, GUEST_MARKER};
