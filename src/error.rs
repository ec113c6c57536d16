// Wavcache -- A lossless codec for cached 16-bit sample streams
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>. This file may not be
// copied, modified, or distributed except according to those terms.

//! The `error` module defines the error and result types shared by every
//! other module in this crate.

use std::error;
use std::fmt;
use std::io;

/// An error that prevents successful encoding or decoding of a stream.
#[derive(Debug)]
pub enum Error {
    /// Not a codec error, but a problem with the underlying IO.
    Io(io::Error),

    /// The byte source ended in the middle of a marker, a literal run, or a
    /// packed group.
    TruncatedStream,

    /// The decoder read a marker whose packer tag bits denote the reserved
    /// value 3.
    UnsupportedPackerTag,

    /// The decoder unpacked a cache index that is not less than the current
    /// cache length.
    CacheOutOfRange,

    /// A run would be longer than the 8191 samples a marker can encode.
    CountTooLarge,

    /// The encoder computed a cache index that exceeds the chosen packer's
    /// maximum representable index. This can only happen if the run
    /// boundary scan in the segmenter is wrong; it is a programmer error,
    /// not a data error.
    InvariantViolation,

    /// `pack`/`unpack` was asked for an encoding size other than 4, 6, or 7.
    UnsupportedPackerSize(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => write!(f, "io error: {}", err),
            Error::TruncatedStream => write!(f, "stream ended in the middle of a block"),
            Error::UnsupportedPackerTag => write!(f, "marker names an unsupported packer tag"),
            Error::CacheOutOfRange => write!(f, "unpacked cache index is out of range"),
            Error::CountTooLarge => write!(f, "run length exceeds the 8191-sample marker limit"),
            Error::InvariantViolation => {
                write!(f, "cache index exceeds the chosen packer's maximum")
            }
            Error::UnsupportedPackerSize(size) => {
                write!(f, "unsupported packer encoding size: {}", size)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Either `T` on success, or an `Error` on failure.
pub type CodecResult<T> = Result<T, Error>;
