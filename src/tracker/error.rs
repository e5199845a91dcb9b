use std::{error::Error as StdError, fmt, result::Result as StdResult, time::Duration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    CatalogUnavailable,
    SubmissionsUnavailable,
    UserInfoUnavailable,
    MalformedResponse,
    Api,
    Network,
    Status(u16),
    Timeout(Duration),
    Storage,
}

#[derive(Debug, Clone)]
struct Inner {
    kind: Kind,
    description: Option<String>,
    cause: Option<Error>,
}

/// Error shared by every fetch, cache and coordinator operation.
///
/// Cloneable so one failed in-flight fetch can be handed to every caller
/// that joined it.
#[derive(Debug, Clone)]
pub struct Error(Box<Inner>);

pub type Result<T> = StdResult<T, Error>;

impl Error {
    pub fn with_kind(kind: Kind) -> Self {
        Self(Box::new(Inner {
            kind,
            description: None,
            cause: None,
        }))
    }
    pub fn with_description<T: Into<String>>(kind: Kind, description: T) -> Self {
        Self(Box::new(Inner {
            kind,
            description: Some(description.into()),
            cause: None,
        }))
    }
    pub(crate) fn caused_by(mut self, cause: Error) -> Self {
        self.0.cause = Some(cause);
        self
    }
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }
    fn write_description(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(d) = &self.0.description {
            write!(f, ": {}", d)?;
        }
        if let Some(c) = &self.0.cause {
            write!(f, " ({})", c)?;
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            Kind::CatalogUnavailable => write!(f, "Problem catalog unavailable")?,
            Kind::SubmissionsUnavailable => write!(f, "Submission history unavailable")?,
            Kind::UserInfoUnavailable => write!(f, "User info unavailable")?,
            Kind::MalformedResponse => write!(f, "Malformed response")?,
            Kind::Api => write!(f, "API request failed")?,
            Kind::Network => write!(f, "Error sending request")?,
            Kind::Status(code) => write!(f, "Server answered with HTTP {}", code)?,
            Kind::Timeout(after) => {
                write!(f, "No response after {}s", after.as_secs_f32())?
            }
            Kind::Storage => write!(f, "Error accessing cache storage")?,
        }
        self.write_description(f)
    }
}
impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.cause.as_ref().map(|e| e as &(dyn StdError + 'static))
    }
}

pub(crate) fn network_error(err: reqwest::Error) -> Error {
    Error::with_description(Kind::Network, err.to_string())
}
pub(crate) fn malformed<T: fmt::Display>(what: T) -> Error {
    Error::with_description(Kind::MalformedResponse, what.to_string())
}
pub(crate) fn storage_error<T: fmt::Display>(what: T) -> Error {
    Error::with_description(Kind::Storage, what.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_chains_cause() {
        let err = Error::with_kind(Kind::CatalogUnavailable)
            .caused_by(Error::with_kind(Kind::Status(500)));
        assert_eq!(
            err.to_string(),
            "Problem catalog unavailable (Server answered with HTTP 500)"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn description_is_appended() {
        let err = malformed("missing result");
        assert_eq!(err.kind(), &Kind::MalformedResponse);
        assert_eq!(err.to_string(), "Malformed response: missing result");
    }
}
