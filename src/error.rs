// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// A rasterization error.
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied value is out of the allowed range.
    ///
    /// Negative dash lengths and unusable render parameters end up here.
    InvalidArgument(String),

    /// A requested feature is recognized but not supported.
    ///
    /// Currently produced only for the reserved filter input names
    /// `SourceAlpha`, `BackgroundAlpha`, `FillPaint` and `StrokePaint`.
    Unimplemented(String),

    /// A pixel buffer allocation failed.
    OutOfMemory,

    /// An internal invariant was violated.
    Internal(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::Unimplemented(what) => write!(f, "'{}' is not implemented", what),
            Error::OutOfMemory => write!(f, "failed to allocate a pixel buffer"),
            Error::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
