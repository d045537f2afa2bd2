#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    /// A rule the user can fix before retrying (empty selection, bad address).
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl Error {
    /// Whether the message can be shown to the user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validate(_) | Self::Invalid(_))
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Server(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! invalid {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Invalid(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Invalid(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_with_invalid(count: usize) -> Result<()> {
        if count == 0 {
            invalid!("select at least one dish");
        }
        Ok(())
    }

    fn fails_with_server() -> Result<()> {
        bail!("generator returned {} recipes", 3);
    }

    #[test]
    fn invalid_is_user_facing() {
        let err = fails_with_invalid(0).unwrap_err();
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "select at least one dish");
        assert!(fails_with_invalid(1).is_ok());
    }

    #[test]
    fn server_is_not_user_facing() {
        let err = fails_with_server().unwrap_err();
        assert!(!err.is_user_facing());
        assert_eq!(err.to_string(), "generator returned 3 recipes");
    }
}
