//! The engine's only route to the audio path.
//!
//! The [`ToneEngine`](crate::ToneEngine) never calls into the renderer. It
//! hands [`RenderCommand`]s to an [`AutomationSink`], which makes the engine
//! constructible and testable without an audio device.

use crossbeam_channel::Sender;
use tonegen_synth::RenderCommand;

/// Receives automation and voice-lifecycle commands from the engine.
///
/// Implementations must not block: the engine runs on the UI/control thread.
pub trait AutomationSink: Send {
    /// Deliver one command.
    fn submit(&mut self, command: RenderCommand);
}

/// Records commands in memory.
impl AutomationSink for Vec<RenderCommand> {
    fn submit(&mut self, command: RenderCommand) {
        self.push(command);
    }
}

/// Sink backed by an unbounded crossbeam channel to a
/// [`Renderer`](tonegen_synth::Renderer).
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<RenderCommand>,
    disconnected: bool,
}

impl ChannelSink {
    /// Wrap the sending half of the renderer's command channel.
    pub fn new(tx: Sender<RenderCommand>) -> Self {
        Self {
            tx,
            disconnected: false,
        }
    }

    /// Whether the renderer has gone away.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl AutomationSink for ChannelSink {
    fn submit(&mut self, command: RenderCommand) {
        if self.tx.send(command).is_err() && !self.disconnected {
            tracing::warn!("audio renderer disconnected, dropping automation");
            self.disconnected = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use tonegen_synth::VoiceId;

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (tx, rx) = unbounded();
        let mut sink = ChannelSink::new(tx);
        sink.submit(RenderCommand::StopVoice {
            id: VoiceId::new(1),
        });
        sink.submit(RenderCommand::StopVoice {
            id: VoiceId::new(2),
        });
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![
                RenderCommand::StopVoice {
                    id: VoiceId::new(1)
                },
                RenderCommand::StopVoice {
                    id: VoiceId::new(2)
                },
            ]
        );
    }

    #[test]
    fn test_disconnected_sink_does_not_panic() {
        let (tx, rx) = unbounded();
        drop(rx);
        let mut sink = ChannelSink::new(tx);
        sink.submit(RenderCommand::StopVoice {
            id: VoiceId::new(1),
        });
        assert!(sink.is_disconnected());
    }
}
