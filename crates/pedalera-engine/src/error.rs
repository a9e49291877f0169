//! Patch configuration errors.

use core::fmt;

/// Errors raised while validating a patch against the board.
///
/// These are configuration errors on the control path; the audio path has no
/// failure modes. A rejected patch leaves the previously applied board
/// running untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    /// A slot routes from itself or from a later slot. The routing graph
    /// must be ordered by slot position: sources are the hardware input or
    /// a strictly earlier slot.
    RouteNotEarlier {
        /// Index of the offending slot.
        slot: u8,
        /// The routing source it requested.
        source: u8,
    },

    /// The patch describes more slots than the board has.
    TooManySlots(usize),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::RouteNotEarlier { slot, source } => write!(
                f,
                "slot {slot} routes from slot {source}, which is not processed before it"
            ),
            PatchError::TooManySlots(n) => write!(
                f,
                "patch describes {n} slots but the board holds {max}",
                max = crate::patch::MAX_SLOTS
            ),
        }
    }
}

impl core::error::Error for PatchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn messages_name_the_offender() {
        let err = PatchError::RouteNotEarlier { slot: 3, source: 7 };
        let msg = std::format!("{err}");
        assert!(msg.contains('3') && msg.contains('7'));

        let msg = std::format!("{}", PatchError::TooManySlots(20));
        assert!(msg.contains("20") && msg.contains("12"));
    }
}
