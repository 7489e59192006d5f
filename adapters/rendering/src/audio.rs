//! One-shot sound cues derived from world events.

use tower_defence_core::{Event, TowerKind};

/// Sound effect requested by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A tower of the given archetype fired.
    TowerFired(TowerKind),
}

/// Collects the cues triggered by a batch of events, in event order.
#[must_use]
pub fn cues_from_events(events: &[Event]) -> Vec<SoundCue> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileFired { kind, .. } => Some(SoundCue::TowerFired(*kind)),
            _ => None,
        })
        .collect()
}

/// Consumer of sound cues. A missing sound is played as silence.
pub trait AudioSink {
    /// Plays a one-shot cue.
    fn play(&mut self, cue: SoundCue);
}

/// Sink that discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: SoundCue) {}
}
