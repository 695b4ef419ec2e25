use crate::backup::result_error::{WithDebugObjectAndFnName, WithMsg};
use itertools::Itertools;
use std::fmt::Debug;
use thiserror::Error;
use thiserror_ext::Construct;

#[derive(Error, Debug, Construct)]
pub enum Error {
    #[error(transparent)]
    #[construct(skip)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    #[construct(skip)]
    ValidationError(#[from] validator::ValidationErrors),
    #[error(transparent)]
    #[construct(skip)]
    SerdeYml(#[from] serde_yml::Error),
    #[error(transparent)]
    #[construct(skip)]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error(transparent)]
    #[construct(skip)]
    Email(#[from] lettre::error::Error),
    #[error(transparent)]
    #[construct(skip)]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
    #[error(transparent)]
    #[construct(skip)]
    ChronoParse(#[from] chrono::ParseError),
    #[error(
        "The command \"{command_line}\" failed. Exit Code: {exit_code}({exit_code_text}). Error Output: {error_output}"
    )]
    CommandFailed {
        command_line: String,
        exit_code: i32,
        exit_code_text: String,
        error_output: String,
    },
    #[error("SMTP server rejected the message: {0}")]
    SmtpRejected(String),
    #[error("{}:\n{}", msg, indent::indent_all_with("  ", error.to_string()))]
    #[construct(skip)]
    WithMsg { msg: String, error: Box<Error> },
    #[error("{:?} {} failed:\n{}", obj_debug, fn_name, indent::indent_all_with("  ", error.to_string()))]
    #[construct(skip)]
    WithDebugObjAndFnName {
        error: Box<Error>,
        obj_debug: Box<dyn Debug + Send>,
        fn_name: String,
    },
    #[error("{}", itertools::join(.0, "\n\n"))]
    #[construct(skip)]
    LotsOfError(Vec<Error>),
}

impl<S: Into<String>, O: Debug + Send + 'static> WithDebugObjectAndFnName<S, O> for Error {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self {
        Error::WithDebugObjAndFnName {
            error: Box::new(self),
            obj_debug: Box::new(obj),
            fn_name: fn_name.into(),
        }
    }
}

impl<S: Into<String>> WithMsg<S> for Error {
    fn with_msg(self, msg: S) -> Self {
        Self::WithMsg {
            msg: msg.into(),
            error: Box::new(self),
        }
    }
}

impl Error {
    pub fn into_iter(self) -> Box<dyn Iterator<Item = Error>> {
        match self {
            Error::LotsOfError(v) => Box::new(v.into_iter().flat_map(|e| e.into_iter())),
            e => Box::new(std::iter::once(e)),
        }
    }

    pub fn chain(self, other: Error) -> Error {
        Error::LotsOfError(self.into_iter().chain(other.into_iter()).collect_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error);

        match error {
            Error::Io(_) => (),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_with_msg() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error);
        let error_with_msg = error.with_msg("Custom message");

        match error_with_msg {
            Error::WithMsg { msg, .. } => assert_eq!(msg, "Custom message"),
            _ => panic!("Expected WithMsg error"),
        }
    }

    #[test]
    fn test_error_with_debug_object_and_fn_name() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error);
        let error_with_debug = error.with_debug_object_and_fn_name("db1 db2", "dump");

        match error_with_debug {
            Error::WithDebugObjAndFnName { fn_name, .. } => assert_eq!(fn_name, "dump"),
            _ => panic!("Expected WithDebugObjAndFnName error"),
        }
    }

    #[test]
    fn test_command_failed_display() {
        let error = Error::command_failed(
            "mysqldump -c -B db1 > db1-20240102.sql",
            2,
            "Misuse of shell builtins",
            "mysqldump: Got error: 1045: Access denied",
        );

        assert_eq!(
            error.to_string(),
            "The command \"mysqldump -c -B db1 > db1-20240102.sql\" failed. \
             Exit Code: 2(Misuse of shell builtins). \
             Error Output: mysqldump: Got error: 1045: Access denied"
        );
    }

    #[test]
    fn test_smtp_rejected_display() {
        let error = Error::smtp_rejected("550 mailbox unavailable");
        assert_eq!(
            error.to_string(),
            "SMTP server rejected the message: 550 mailbox unavailable"
        );
    }

    #[test]
    fn test_error_chain_flattens() {
        let error1 = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "error1"));
        let error2 = Error::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "error2"));
        let error3 = Error::smtp_rejected("error3");

        let chained = error1.chain(error2).chain(error3);
        match chained {
            Error::LotsOfError(errors) => assert_eq!(errors.len(), 3),
            _ => panic!("Expected LotsOfError"),
        }
    }

    #[test]
    fn test_error_into_iter_single() {
        let error = Error::smtp_rejected("550 mailbox unavailable");
        assert_eq!(error.into_iter().count(), 1);
    }

    #[test]
    fn test_error_with_msg_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error);
        let error_str = error.with_msg("Operation failed").to_string();

        assert!(error_str.starts_with("Operation failed:\n"));
        assert!(error_str.contains("  file not found"));
    }

    #[test]
    fn test_error_with_debug_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error);
        let error_str = error
            .with_debug_object_and_fn_name(42, "test_function")
            .to_string();

        assert!(error_str.contains("test_function"));
        assert!(error_str.contains("failed"));
        assert!(error_str.contains("file not found"));
    }
}
