//! Error type and the disconnected-session swallow helper.
//!
//! Nothing in this crate surfaces errors to the rendering tree. The only
//! failure that is routinely expected is a [`InteropError::Disconnected`]
//! peer during teardown or delivery, which call sites drop through
//! [`IgnoreDisconnected`]. Every other error still propagates.

use thiserror::Error;

/// Errors produced by the interop layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteropError {
    /// The remote end of a call has been torn down: a widget session whose
    /// receiver was dropped, or a listener module that was already disposed.
    #[error("remote session disconnected")]
    Disconnected,
    /// A widget id that was never attached, or was already disposed.
    #[error("unknown widget")]
    UnknownWidget,
    /// A shortcut string that does not normalize to `modifiers+key`.
    #[error("invalid key combination: {0:?}")]
    InvalidCombo(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, InteropError>;

/// Drop [`InteropError::Disconnected`] and keep every other error.
pub trait IgnoreDisconnected<T> {
    /// `Ok(Some(v))` on success, `Ok(None)` when the peer is gone.
    fn ignore_disconnected(self) -> Result<Option<T>>;
}

impl<T> IgnoreDisconnected<T> for Result<T> {
    fn ignore_disconnected(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(InteropError::Disconnected) => {
                tracing::trace!("ignoring call into disconnected session");
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_passes_through() {
        let r: Result<u8> = Ok(3);
        assert_eq!(r.ignore_disconnected(), Ok(Some(3)));
    }

    #[test]
    fn disconnected_is_swallowed() {
        let r: Result<u8> = Err(InteropError::Disconnected);
        assert_eq!(r.ignore_disconnected(), Ok(None));
    }

    #[test]
    fn other_errors_are_kept() {
        let r: Result<u8> = Err(InteropError::InvalidCombo("ctrl+".into()));
        assert_eq!(
            r.ignore_disconnected(),
            Err(InteropError::InvalidCombo("ctrl+".into()))
        );
        let r: Result<u8> = Err(InteropError::UnknownWidget);
        assert!(r.ignore_disconnected().is_err());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            InteropError::Disconnected.to_string(),
            "remote session disconnected"
        );
        assert_eq!(
            InteropError::InvalidCombo("+".into()).to_string(),
            "invalid key combination: \"+\""
        );
    }
}
