use std::fmt;
use std::io;

use qwire::frame::FrameError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const NOT_FOUND: i32 = 51;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ShortWrite { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
        FrameError::ShortRead { .. }
        | FrameError::InvalidFrame { .. }
        | FrameError::FrameTooLarge { .. }
        | FrameError::UnknownMessageType(_)
        | FrameError::UnregisteredMessage
        | FrameError::Decode(_)
        | FrameError::Encode(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwire::frame::MessageType;

    #[test]
    fn frame_errors_map_to_data_invalid() {
        let err = frame_error("decode failed", FrameError::InvalidFrame { size: 2 });
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("decode failed: invalid frame"));

        let err = frame_error(
            "decode failed",
            FrameError::UnknownMessageType(MessageType(106)),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn io_errors_map_by_kind() {
        let err = frame_error(
            "read failed",
            FrameError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);

        let err = io_error("open", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, NOT_FOUND);
    }
}
