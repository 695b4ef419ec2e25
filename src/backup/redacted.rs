//! The SMTP password, kept out of logs.
//!
//! Read as a plain string from `backup.yml`. `Debug` and `Serialize` only
//! ever print [`REDACTED_SECRET`], and the buffer is wiped on drop.

use bon::Builder;
use derive_more::From;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Formatter};
use std::result;
use validator::Validate;
use zeroize::Zeroize;

pub static REDACTED_SECRET: &str = "###REDACTED###";

#[derive(Validate, Clone, Zeroize, From, Builder, PartialEq, Eq)]
pub struct RedactedString {
    #[validate(length(min = 1))]
    #[builder(into)]
    secret: String,
}

impl RedactedString {
    /// The clear text, for handing to the SMTP authenticator only.
    pub fn expose(&self) -> &str {
        &self.secret
    }
}

impl Debug for RedactedString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(REDACTED_SECRET)
    }
}

impl Serialize for RedactedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> result::Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED_SECRET)
    }
}

impl<'de> Deserialize<'de> for RedactedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl Drop for RedactedString {
    fn drop(&mut self) {
        self.zeroize();
    }
}
