pub mod backup_config;
pub mod dump;
pub mod job;
pub mod mail;
pub mod process;
pub mod redacted;
pub mod result_error;
pub mod validate;

macro_rules! function_path {
    () => {
        concat!(module_path!(), "::", function_name!(), " ", file!(), ":", line!())
    };
}

pub(crate) use function_path;
