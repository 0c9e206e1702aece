//! Logging facade over `log` or `defmt`, whichever feature is enabled.
//!
//! The codec only logs at debug and trace level. Without a logging feature
//! both macros still type-check their arguments but never evaluate them, so
//! call sites compile the same way in every configuration.

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Cannot select log and defmt features together.");

#[cfg(feature = "defmt")]
pub use defmt::{debug, trace};

#[cfg(feature = "log")]
pub use log::{debug, trace};

#[cfg(not(any(feature = "defmt", feature = "log")))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    };
}

#[cfg(not(any(feature = "defmt", feature = "log")))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        if false {
            let _ = ::core::format_args!($($arg)*);
        }
    };
}
