//! Error types for the clhandle crate.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::ffi::raw::cl_int;

/// Result type alias for clhandle operations.
pub type Result<T> = std::result::Result<T, Error>;

macro_rules! define_error_codes {
    ($($name:ident = $raw:literal),* $(,)?) => {
        /// Status code reported by a native call.
        ///
        /// Codes outside the known set are kept verbatim in [`ErrorCode::Other`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ErrorCode {
            $(
                #[allow(missing_docs)]
                $name,
            )*
            /// A status this crate has no name for.
            Other(i32),
        }

        impl ErrorCode {
            /// Map a raw native status to its code.
            pub const fn from_raw(raw: cl_int) -> Self {
                match raw {
                    $($raw => ErrorCode::$name,)*
                    other => ErrorCode::Other(other),
                }
            }

            /// The raw native status.
            pub const fn as_raw(self) -> cl_int {
                match self {
                    $(ErrorCode::$name => $raw,)*
                    ErrorCode::Other(raw) => raw,
                }
            }

            /// Name of the code as it appears in failure messages.
            pub fn name(self) -> std::borrow::Cow<'static, str> {
                match self {
                    $(ErrorCode::$name => std::borrow::Cow::Borrowed(stringify!($name)),)*
                    ErrorCode::Other(raw) => std::borrow::Cow::Owned(raw.to_string()),
                }
            }
        }
    };
}

define_error_codes! {
    Success = 0,
    DeviceNotFound = -1,
    DeviceNotAvailable = -2,
    CompilerNotAvailable = -3,
    MemObjectAllocationFailure = -4,
    OutOfResources = -5,
    OutOfHostMemory = -6,
    ProfilingInfoNotAvailable = -7,
    MemCopyOverlap = -8,
    ImageFormatMismatch = -9,
    ImageFormatNotSupported = -10,
    BuildProgramFailure = -11,
    MapFailure = -12,
    MisalignedSubBufferOffset = -13,
    ExecStatusErrorForEventsInWaitList = -14,
    CompileProgramFailure = -15,
    LinkerNotAvailable = -16,
    LinkProgramFailure = -17,
    DevicePartitionFailed = -18,
    KernelArgInfoNotAvailable = -19,
    InvalidValue = -30,
    InvalidDeviceType = -31,
    InvalidPlatform = -32,
    InvalidDevice = -33,
    InvalidContext = -34,
    InvalidQueueProperties = -35,
    InvalidCommandQueue = -36,
    InvalidHostPtr = -37,
    InvalidMemObject = -38,
    InvalidImageFormatDescriptor = -39,
    InvalidImageSize = -40,
    InvalidSampler = -41,
    InvalidBinary = -42,
    InvalidBuildOptions = -43,
    InvalidProgram = -44,
    InvalidProgramExecutable = -45,
    InvalidKernelName = -46,
    InvalidKernelDefinition = -47,
    InvalidKernel = -48,
    InvalidArgIndex = -49,
    InvalidArgValue = -50,
    InvalidArgSize = -51,
    InvalidKernelArgs = -52,
    InvalidWorkDimension = -53,
    InvalidWorkGroupSize = -54,
    InvalidWorkItemSize = -55,
    InvalidGlobalOffset = -56,
    InvalidEventWaitList = -57,
    InvalidEvent = -58,
    InvalidOperation = -59,
    InvalidGlObject = -60,
    InvalidBufferSize = -61,
    InvalidMipLevel = -62,
    InvalidGlobalWorkSize = -63,
    InvalidProperty = -64,
    InvalidImageDescriptor = -65,
    InvalidCompilerOptions = -66,
    InvalidLinkerOptions = -67,
    InvalidDevicePartitionCount = -68,
    PlatformNotFoundKhr = -1001,
}

impl ErrorCode {
    /// Check if this is the designated success status.
    pub const fn is_success(self) -> bool {
        matches!(self, ErrorCode::Success)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<cl_int> for ErrorCode {
    fn from(raw: cl_int) -> Self {
        ErrorCode::from_raw(raw)
    }
}

impl From<ErrorCode> for cl_int {
    fn from(code: ErrorCode) -> cl_int {
        code.as_raw()
    }
}

/// A native call returned a status other than success.
///
/// Renders as `"<code>: <message>"` when a message is attached, else as the
/// code name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCallError {
    code: ErrorCode,
    message: Option<String>,
    source: Option<Box<NativeCallError>>,
}

impl NativeCallError {
    /// Failure carrying only a status code.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            source: None,
        }
    }

    /// Failure with a context message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            source: None,
        }
    }

    /// Failure with a context message that wraps an earlier failure.
    pub fn with_source(code: ErrorCode, message: impl Into<String>, source: NativeCallError) -> Self {
        Self {
            code,
            message: Some(message.into()),
            source: Some(Box::new(source)),
        }
    }

    /// The native status.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The context message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The wrapped failure, if any.
    pub fn inner(&self) -> Option<&NativeCallError> {
        self.source.as_deref()
    }
}

impl fmt::Display for NativeCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for NativeCallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<ErrorCode> for NativeCallError {
    fn from(code: ErrorCode) -> Self {
        NativeCallError::new(code)
    }
}

/// Error type for clhandle operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A native call reported a failure status.
    #[error(transparent)]
    Native(#[from] NativeCallError),

    /// The OpenCL library could not be opened.
    #[error("failed to load OpenCL library {path:?}: {source}")]
    Load {
        /// Path or name that was tried last.
        path: PathBuf,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },

    /// The OpenCL library lacks a required entry point.
    #[error("OpenCL library is missing symbol {symbol}: {source}")]
    MissingSymbol {
        /// Symbol name.
        symbol: &'static str,
        /// Loader error.
        #[source]
        source: libloading::Error,
    },

    /// No dispatch table is installed.
    #[error("OpenCL dispatch table not initialized")]
    NotInitialized,

    /// Function argument is invalid before reaching the native layer.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Arena key refers to a handle that was already released.
    #[error("stale arena key")]
    StaleKey,
}

impl Error {
    /// Check if this is a native status failure.
    pub fn is_native(&self) -> bool {
        matches!(self, Error::Native(_))
    }

    /// Check if the dispatch table was missing.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Error::NotInitialized)
    }

    /// The native status behind this error, if it came from a native call.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Native(e) => Some(e.code()),
            _ => None,
        }
    }
}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Error::Native(NativeCallError::new(code))
    }
}
