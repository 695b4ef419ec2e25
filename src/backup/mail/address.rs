use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use std::result;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single value or a list of them, e.g. `a@x.com` or `[a@x.com, b@x.com]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl<T: Clone> OneOrMany<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Self::One(one) => vec![one.clone()],
            Self::Many(many) => many.clone(),
        }
    }
}

impl<T> OneOrMany<T> {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(many) => many.is_empty(),
        }
    }
}

/// Who receives the backup mail
///
/// Either a flat list where everybody is `to`:
///
/// ```yaml
/// recipients: [a@x.com, b@x.com]
/// ```
///
/// or separate `to`/`cc`/`bcc` lists, each of which may be a single address:
///
/// ```yaml
/// recipients:
///   to: a@x.com
///   cc: [b@x.com, c@x.com]
/// ```
///
/// Keys other than `to`/`cc`/`bcc` are rejected, so a misspelled `Cc:` fails
/// loudly instead of losing recipients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum Addresses {
    // Must stay first: a sequence would otherwise fill `Keyed` positionally.
    Flat(OneOrMany<Mailbox>),
    Keyed {
        to: OneOrMany<Mailbox>,
        #[serde(default)]
        cc: OneOrMany<Mailbox>,
        #[serde(default)]
        bcc: OneOrMany<Mailbox>,
    },
}

/// Resolved recipient sets of a message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recipients {
    pub to: Vec<Mailbox>,
    pub cc: Vec<Mailbox>,
    pub bcc: Vec<Mailbox>,
}

impl Addresses {
    pub fn resolve(&self) -> Recipients {
        match self {
            Self::Flat(to) => Recipients {
                to: to.to_vec(),
                ..Default::default()
            },
            Self::Keyed { to, cc, bcc } => Recipients {
                to: to.to_vec(),
                cc: cc.to_vec(),
                bcc: bcc.to_vec(),
            },
        }
    }

    fn to(&self) -> &OneOrMany<Mailbox> {
        match self {
            Self::Flat(to) => to,
            Self::Keyed { to, .. } => to,
        }
    }
}

impl From<&Addresses> for Recipients {
    fn from(addresses: &Addresses) -> Self {
        addresses.resolve()
    }
}

impl Validate for Addresses {
    fn validate(&self) -> result::Result<(), ValidationErrors> {
        if self.to().is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add(
                "to",
                ValidationError::new("length")
                    .with_message("at least one `to` recipient is required".into()),
            );
            return Err(errors);
        }

        Ok(())
    }
}
