use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for geostore operations
///
/// Every failure in the crate is a validation failure detected before any
/// store mutation, so the kinds describe which input was rejected.
///
/// # Examples
///
/// ```rust
/// use geostore::errors::{ErrorKind, GeoError, GeoResult};
///
/// fn example() -> GeoResult<()> {
///     Err(GeoError::new("Level 31 is out of range", ErrorKind::InvalidLevel))
/// }
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::InvalidLevel);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A cell level is outside the supported range, or a level range is inverted
    InvalidLevel,
    /// Latitude or longitude is outside its valid range, or not a number
    InvalidCoordinate,
    /// Search radius is negative, NaN or infinite
    InvalidRadius,
    /// A polygon ring cannot be turned into a simple loop
    InvalidGeometry,
    /// Index configuration is incomplete or inconsistent
    InvalidConfiguration,
    /// Internal error (usually indicates a bug in a geometry implementation)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidLevel => write!(f, "Invalid level"),
            ErrorKind::InvalidCoordinate => write!(f, "Invalid coordinate"),
            ErrorKind::InvalidRadius => write!(f, "Invalid radius"),
            ErrorKind::InvalidGeometry => write!(f, "Invalid geometry"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid configuration"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom geostore error type.
///
/// `GeoError` carries the error message, its kind, an optional cause and the
/// backtrace captured where the error was created.
///
/// # Examples
///
/// ```rust
/// use geostore::errors::{ErrorKind, GeoError};
///
/// let cause = GeoError::new("Latitude 91 out of range", ErrorKind::InvalidCoordinate);
/// let err = GeoError::new_with_cause("Polygon rejected", ErrorKind::InvalidGeometry, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct GeoError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<GeoError>>,
    backtrace: Backtrace,
}

impl GeoError {
    /// Creates a new `GeoError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        GeoError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Backtrace::new(),
        }
    }

    /// Creates a new `GeoError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: GeoError) -> Self {
        GeoError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&GeoError> {
        self.cause.as_deref()
    }
}

impl Display for GeoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for GeoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for GeoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for geostore operations.
pub type GeoResult<T> = Result<T, GeoError>;
