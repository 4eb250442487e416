//! Event types and sinks for observing scene builds.
//!
//! This module defines [`SceneEvent`] and a set of sinks to emit, collect, or forward events
//! while a [`crate::scene::plan::ScenePlan`] is built via
//! [`crate::scene::builder::SceneBuilder`] or [`crate::scene::builder::build_scene`].
use crate::scene::builder::SceneConfig;
use crate::scene::reservation::TextReservation;

/// Describes events emitted by scene builds.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum SceneEvent {
    /// Emitted when a build starts.
    BuildStarted {
        /// The build configuration used.
        config: SceneConfig,
        /// Number of generators in the plan.
        generator_count: usize,
    },

    /// Emitted once the title has been measured.
    ReservationInstalled {
        /// The reservation generators will see; empty when no title is used.
        reservation: TextReservation,
    },

    /// Emitted when a generator produced its layers.
    GeneratorFinished {
        /// Index of the generator in the plan.
        index: usize,
        /// The generator name.
        name: String,
        /// Number of layers it produced.
        layers: usize,
    },

    /// Non-fatal warning generated during a build.
    Warning {
        /// Context string (e.g. generator name, "title").
        context: String,
        /// Human-readable message.
        message: String,
    },

    /// Emitted when the whole plan finished.
    BuildFinished {
        /// Total number of layers in the scene.
        layer_count: usize,
    },
}

/// A generic event sink that accepts [`SceneEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SceneEvent);

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = SceneEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SceneEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SceneEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SceneEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SceneEvent),
{
    #[inline]
    fn send(&mut self, event: SceneEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SceneEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<SceneEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Messages of all collected [`SceneEvent::Warning`]s.
    pub fn warnings(&self) -> impl Iterator<Item = &str> + '_ {
        self.events.iter().filter_map(|e| match e {
            SceneEvent::Warning { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SceneEvent) {
        self.events.push(event);
    }
}
