use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding;
use crate::error::TypeError;
use crate::multihash::Multihash;

/// Content address: the base64url (unpadded) encoding of a [`Multihash`].
///
/// An `Address` is plain text so it can travel in URLs, JSON bodies, and
/// anchor records unchanged. Construction from a multihash is infallible;
/// an address received from outside is only checked when it is decoded.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Encode a multihash as an address.
    pub fn from_multihash(mh: &Multihash) -> Self {
        Self(encoding::encode_to_string(&mh.to_bytes()))
    }

    /// Decode the address back into the multihash it names.
    pub fn decode(&self) -> Result<Multihash, TypeError> {
        let bytes = encoding::decode_string(&self.0)?;
        Multihash::from_bytes(&bytes)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
