pub mod address;
pub mod message;
pub mod smtp;

use crate::backup::mail::message::MailMessage;
use crate::backup::result_error::result::Result;

pub trait Mailer {
    fn send(&self, message: &MailMessage) -> Result<()>;
}
