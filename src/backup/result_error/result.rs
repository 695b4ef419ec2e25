use crate::backup::result_error::error::Error;
use crate::backup::result_error::{WithDebugObjectAndFnName, WithMsg};
use std::fmt::Debug;

pub type Result<T> = std::result::Result<T, Error>;

impl<S: Into<String>, O: Debug + Send + 'static, R> WithDebugObjectAndFnName<S, O> for Result<R> {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self {
        self.map_err(|e| e.with_debug_object_and_fn_name(obj, fn_name))
    }
}

impl<R, S: Into<String>> WithMsg<S> for Result<R> {
    fn with_msg(self, msg: S) -> Self {
        self.map_err(|e| e.with_msg(msg))
    }
}

/// Keeps the primary result, folding a follow-up error into it if there was one.
pub fn chain_result<R>(primary: Result<R>, secondary: Result<()>) -> Result<R> {
    match (primary, secondary) {
        (primary, Ok(())) => primary,
        (Ok(_), Err(e)) => Err(e),
        (Err(e1), Err(e2)) => Err(e1.chain(e2)),
    }
}
