//! Call-site frames captured when an error is created or derived.
//!
//! Capture is cheap: the caller's source location comes from
//! `#[track_caller]`, and with the `backtrace` feature a handful of raw
//! instruction pointers are recorded without touching debug info.
//! Symbol names are only resolved when the frame is rendered.

use std::fmt;
use std::panic::Location;

/// Raw return addresses kept per frame.
#[cfg(feature = "backtrace")]
const DEPTH: usize = 3;

/// A snapshot of the call site that produced an [`ApiError`](crate::ApiError).
///
/// Frames are diagnostic only. They take no part in equality or hashing
/// of the error that carries them.
#[derive(Clone, Copy)]
pub struct Frame {
    location: &'static Location<'static>,
    #[cfg(feature = "backtrace")]
    ips: [usize; DEPTH],
}

impl Frame {
    /// Capture the frame of whoever called the current `#[track_caller]` chain.
    ///
    /// The raw stack starts at the function that invoked `capture`
    /// (a constructor or derivation method), followed by its caller.
    #[track_caller]
    #[inline(never)]
    pub fn capture() -> Self {
        Self {
            location: Location::caller(),
            #[cfg(feature = "backtrace")]
            ips: callers(1),
        }
    }

    /// Source location of the call site.
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Source file of the call site.
    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    /// Source line of the call site.
    pub fn line(&self) -> u32 {
        self.location.line()
    }

    /// Resolve the calling function's name.
    ///
    /// The first captured frame is the constructor or derivation method
    /// itself and is skipped by position; the second is the caller. Returns
    /// `None` when that frame does not symbolize or the feature is disabled.
    ///
    /// In optimized builds inlining and tail calls can fold the caller away,
    /// so the name may belong to a different function than [`location`](Frame::location).
    pub fn function(&self) -> Option<String> {
        #[cfg(feature = "backtrace")]
        {
            match self.ips.get(1) {
                Some(&ip) if ip != 0 => symbol_name(ip),
                _ => None,
            }
        }

        #[cfg(not(feature = "backtrace"))]
        {
            None
        }
    }
}

/// Walk the stack, skip `callers` itself plus `skip` more frames, and keep
/// the next [`DEPTH`] instruction pointers. Unfilled slots stay zero.
#[cfg(feature = "backtrace")]
#[inline(never)]
fn callers(mut skip: usize) -> [usize; DEPTH] {
    let this = callers as *const () as usize;
    let mut ips = [0usize; DEPTH];
    let mut seen_self = false;
    let mut filled = 0;

    backtrace::trace(|frame| {
        if !seen_self {
            seen_self = frame.symbol_address() as usize == this;
            return true;
        }
        if skip > 0 {
            skip -= 1;
            return true;
        }
        ips[filled] = frame.ip() as usize;
        filled += 1;
        filled < DEPTH
    });

    ips
}

#[cfg(feature = "backtrace")]
fn symbol_name(ip: usize) -> Option<String> {
    let mut name = None;
    // Return addresses point past the call; step back into it.
    let addr = ip.wrapping_sub(1) as *mut std::ffi::c_void;
    backtrace::resolve(addr, |symbol| {
        if name.is_none() {
            name = symbol.name().map(|n| format!("{n:#}"));
        }
    });
    name
}

/// `file:line`
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file(), self.line())
    }
}

/// Function name (when resolvable) and `file:line`, one per line.
impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = self.function() {
            writeln!(f, "{}", function)?;
        }
        writeln!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline(never)]
    fn capture_here() -> Frame {
        Frame::capture()
    }

    #[test]
    fn test_location_is_caller() {
        let line = line!() + 1;
        let frame = Frame::capture();
        assert_eq!(frame.file(), file!());
        assert_eq!(frame.line(), line);
    }

    #[test]
    fn test_display_is_file_line() {
        let frame = Frame::capture();
        assert_eq!(frame.to_string(), format!("{}:{}", file!(), frame.line()));
    }

    #[test]
    fn test_debug_ends_with_location() {
        let frame = capture_here();
        let rendered = format!("{:?}", frame);
        assert!(rendered.ends_with(&format!("{}\n", frame)));
        assert!(rendered.lines().count() <= 2);
    }

    #[cfg(all(feature = "backtrace", debug_assertions))]
    #[test]
    fn test_function_is_second_frame() {
        let captured = capture_here();
        // ips[0] is capture_here, the frame that called `capture`.
        let frame = Frame {
            location: captured.location,
            ips: [1, captured.ips[0], 0],
        };
        let function = frame.function().expect("resolved");
        assert!(function.ends_with("capture_here"), "resolved {}", function);
    }

    #[cfg(feature = "backtrace")]
    #[test]
    fn test_unresolved_caller_is_omitted() {
        let captured = capture_here();
        let frame = Frame {
            location: captured.location,
            ips: [captured.ips[0], 1, captured.ips[1]],
        };
        assert_eq!(frame.function(), None);
        assert_eq!(format!("{:?}", frame), format!("{}\n", frame));
    }

    #[cfg(feature = "backtrace")]
    #[test]
    fn test_function_degrades_on_empty_frame() {
        let frame = Frame {
            location: Location::caller(),
            ips: [0; DEPTH],
        };
        assert_eq!(frame.function(), None);
        assert_eq!(format!("{:?}", frame), format!("{}\n", frame));
    }
}
