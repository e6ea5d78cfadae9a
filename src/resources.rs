//! Mana nodes scattered over the terrain.

use glam::Vec3;
use log::debug;
use rand::Rng;

use crate::config::NodeConfig;
use crate::terrain::TerrainSampler;

/// A collectible hovering above the terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManaNode {
    /// Centre of the node.
    pub position: Vec3,
    /// Mana granted to the first collector.
    pub value: u32,
    collected: bool,
}

impl ManaNode {
    /// Whether the node has already been collected.
    #[must_use]
    pub const fn is_collected(&self) -> bool {
        self.collected
    }
}

/// Report of one node collected by [`ResourceField::check_collection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectedNode {
    /// Where the node hovered.
    pub position: Vec3,
    /// Mana granted.
    pub value: u32,
}

/// All mana nodes of the current world generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceField {
    config: NodeConfig,
    nodes: Vec<ManaNode>,
}

impl ResourceField {
    /// Creates an empty field.
    #[must_use]
    pub const fn new(config: NodeConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
        }
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Replaces every node with `count` freshly scattered ones.
    ///
    /// Nodes are spread uniformly over the central `spread` fraction of the
    /// world and hover `hover_height` above the terrain.
    pub fn populate<T, R>(&mut self, count: usize, world_size: f32, terrain: &T, rng: &mut R)
    where
        T: TerrainSampler + ?Sized,
        R: Rng,
    {
        self.nodes.clear();
        let half = (self.config.spread * world_size / 2.0).abs();
        let low = self.config.min_value.min(self.config.max_value);
        let high = self.config.min_value.max(self.config.max_value);
        for _ in 0..count {
            let (x, z) = if half > 0.0 {
                (rng.gen_range(-half..=half), rng.gen_range(-half..=half))
            } else {
                (0.0, 0.0)
            };
            let value = rng.gen_range(low..=high);
            self.place(x, z, value, terrain);
        }
        debug!("populated {count} mana nodes across {world_size} units");
    }

    /// Adds a single node at `(x, z)`, hovering above the terrain.
    pub fn place<T: TerrainSampler + ?Sized>(&mut self, x: f32, z: f32, value: u32, terrain: &T) {
        let y = terrain.sample_height(x, z) + self.config.hover_height;
        self.nodes.push(ManaNode {
            position: Vec3::new(x, y, z),
            value,
            collected: false,
        });
    }

    /// Collects every uncollected node within reach of `position`.
    ///
    /// A node is in reach when its centre lies closer than
    /// `radius + node radius`. Collected nodes never return again.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use skycarpet::config::NodeConfig;
    /// use skycarpet::resources::ResourceField;
    /// use skycarpet::terrain::HeightField;
    ///
    /// let terrain = HeightField::generate(1.0, 1000.0, 60.0);
    /// let mut field = ResourceField::new(NodeConfig::default());
    /// field.place(10.0, 10.0, 15, &terrain);
    /// let node = field.nodes()[0].position;
    /// assert_eq!(field.check_collection(node, 5.0).len(), 1);
    /// assert!(field.check_collection(node, 5.0).is_empty());
    /// ```
    pub fn check_collection(&mut self, position: Vec3, radius: f32) -> Vec<CollectedNode> {
        let reach = radius + self.config.radius;
        let collected: Vec<CollectedNode> = self
            .nodes
            .iter_mut()
            .filter(|node| !node.collected && node.position.distance(position) < reach)
            .map(|node| {
                node.collected = true;
                CollectedNode {
                    position: node.position,
                    value: node.value,
                }
            })
            .collect();
        for node in &collected {
            debug!("collected mana node worth {} at {:?}", node.value, node.position);
        }
        collected
    }

    /// All nodes of this generation, collected or not.
    #[must_use]
    pub fn nodes(&self) -> &[ManaNode] {
        &self.nodes
    }

    /// Number of nodes still waiting to be collected.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.nodes.iter().filter(|node| !node.collected).count()
    }

    /// Removes every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
