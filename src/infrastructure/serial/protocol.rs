//! Rover motion command wire format.
//!
//! The firmware interprets each received byte independently: one ASCII
//! character per command, no framing, no checksum, no acknowledgement
//! channel back from the rover.

/// Motion commands understood by the ZUMOE2 firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    Forward,
    Right,
    Left,
    Back,
    Stop,
}

impl MotionCommand {
    pub const ALL: [MotionCommand; 5] = [
        Self::Forward,
        Self::Right,
        Self::Left,
        Self::Back,
        Self::Stop,
    ];

    /// The single-character payload written to the serial link.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Forward => "1",
            Self::Right => "2",
            Self::Left => "3",
            Self::Back => "4",
            Self::Stop => "5",
        }
    }

    /// Parse a wire character back into a command.
    pub fn from_wire(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Forward),
            '2' => Some(Self::Right),
            '3' => Some(Self::Left),
            '4' => Some(Self::Back),
            '5' => Some(Self::Stop),
            _ => None,
        }
    }

    /// Human-readable label for notices.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Forward => "Forward",
            Self::Right => "Right",
            Self::Left => "Left",
            Self::Back => "Back",
            Self::Stop => "Stop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_payloads_are_single_ascii_digits() {
        assert_eq!(MotionCommand::Forward.as_wire(), "1");
        assert_eq!(MotionCommand::Stop.as_wire(), "5");
        for command in MotionCommand::ALL {
            assert_eq!(command.as_wire().len(), 1);
        }
    }

    #[test]
    fn wire_characters_round_trip() {
        for command in MotionCommand::ALL {
            let c = command.as_wire().chars().next().expect("one char");
            assert_eq!(MotionCommand::from_wire(c), Some(command));
        }
        assert_eq!(MotionCommand::from_wire('9'), None);
        assert_eq!(MotionCommand::from_wire('x'), None);
    }
}
