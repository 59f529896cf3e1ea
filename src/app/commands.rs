//! Inbound command decoding.
//!
//! Messages arriving on the command topic carry bare ASCII tokens. The
//! dispatcher maps them to sequencer actions and nothing else — no
//! network I/O, no errors: an unrecognised payload is simply ignored.

use crate::config::SystemConfig;

/// Decoded remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundCommand {
    /// Start a beep sequence.
    Beep { times: u16, duration_ms: u32 },
    /// Silence the sequencer immediately.
    Stop,
}

/// Maps command-topic payloads to [`InboundCommand`]s.
pub struct CommandDispatcher {
    beep_times: u16,
    beep_duration_ms: u32,
}

impl CommandDispatcher {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            beep_times: config.command_beep_times,
            beep_duration_ms: config.command_beep_duration_ms,
        }
    }

    /// Decode a raw payload. `None` for anything unrecognised.
    pub fn decode(&self, payload: &[u8]) -> Option<InboundCommand> {
        match payload {
            b"BEEP" => Some(InboundCommand::Beep {
                times: self.beep_times,
                duration_ms: self.beep_duration_ms,
            }),
            b"STOP" => Some(InboundCommand::Stop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> CommandDispatcher {
        CommandDispatcher::new(&SystemConfig::default())
    }

    #[test]
    fn beep_token_maps_to_configured_sequence() {
        assert_eq!(
            dispatcher().decode(b"BEEP"),
            Some(InboundCommand::Beep {
                times: 5,
                duration_ms: 300
            })
        );
    }

    #[test]
    fn stop_token_maps_to_stop() {
        assert_eq!(dispatcher().decode(b"STOP"), Some(InboundCommand::Stop));
    }

    #[test]
    fn unknown_payloads_are_ignored() {
        let d = dispatcher();
        assert_eq!(d.decode(b""), None);
        assert_eq!(d.decode(b"beep"), None); // case-sensitive
        assert_eq!(d.decode(b"BEEP "), None);
        assert_eq!(d.decode(b"RESTART"), None);
        assert_eq!(d.decode(&[0xff, 0xfe]), None);
    }
}
