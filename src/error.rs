use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The frame source reported an I/O error.
    ReadFailure,
    /// The frame source returned a report of the wrong size.
    ShortRead { len: usize },
    /// The session deadline elapsed before both values were observed.
    Timeout,
    /// The publisher rejected a message.
    PublishFailure,
    /// A published topic does not fit the topic buffer.
    TopicTooLong,
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Transport failures map to `1` and a timed-out session to `2`. Publish
    /// failures do not invalidate a reading that was already reported, so
    /// they map to `0`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ReadFailure | Error::ShortRead { .. } => 1,
            Error::Timeout => 2,
            Error::PublishFailure | Error::TopicTooLong => 0,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReadFailure => write!(f, "failed to read frame from device"),
            Error::ShortRead { len } => write!(f, "wrong read size: got {len} bytes"),
            Error::Timeout => write!(f, "timeout..."),
            Error::PublishFailure => write!(f, "failed to publish reading"),
            Error::TopicTooLong => write!(f, "topic too long"),
        }
    }
}
