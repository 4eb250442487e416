//! Ordered list of scene families to draw.
use crate::scene::clouds::CloudGenerator;
use crate::scene::scatter::ScatterGenerator;
use crate::scene::trees::TreeGenerator;
use crate::scene::waves::WaveGenerator;
use crate::scene::SceneGenerator;

/// A scene plan composed of one or more [`SceneGenerator`]s, run in order.
#[derive(Default)]
#[non_exhaustive]
pub struct ScenePlan {
    pub generators: Vec<Box<dyn SceneGenerator>>,
}

impl ScenePlan {
    /// Create a new empty plan.
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// Add a single generator to the plan.
    pub fn with_generator(mut self, generator: Box<dyn SceneGenerator>) -> Self {
        self.generators.push(generator);
        self
    }

    /// Add a concrete generator to the plan.
    pub fn with<G: SceneGenerator + 'static>(self, generator: G) -> Self {
        self.with_generator(Box::new(generator))
    }

    /// Add multiple generators to the plan.
    pub fn with_generators(mut self, generators: Vec<Box<dyn SceneGenerator>>) -> Self {
        self.generators.extend(generators);
        self
    }

    pub fn waves() -> Self {
        Self::new().with(WaveGenerator::default())
    }

    pub fn blobs() -> Self {
        Self::new().with(ScatterGenerator::blobs())
    }

    pub fn ovals() -> Self {
        Self::new().with(ScatterGenerator::ovals())
    }

    pub fn clouds() -> Self {
        Self::new().with(CloudGenerator::default())
    }

    pub fn trees() -> Self {
        Self::new().with(TreeGenerator::default())
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Generator names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }
}
