//! Error type of the backup run and the context helpers wrapped around it.
//!
//! Failures bubble up to `main` unchanged except for the context attached
//! on the way, so the single `failed, reason: ..` line explains the whole
//! path (config file, command line, SMTP host).

use std::fmt::Debug;

pub mod error;
pub mod result;

/// Wraps an error with the value being worked on and the function that failed.
pub trait WithDebugObjectAndFnName<S: Into<String>, O: Debug + 'static> {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self;
}

/// Prefixes an error with a human readable message.
pub trait WithMsg<S: Into<String>> {
    fn with_msg(self, msg: S) -> Self;
}
