//! Mana node collection against a generated height field.
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};
use skycarpet::config::NodeConfig;
use skycarpet::resources::{CollectedNode, ResourceField};
use skycarpet::terrain::{HeightField, TerrainSampler};

#[fixture]
fn terrain() -> HeightField {
    HeightField::generate(3.0, 1000.0, 60.0)
}

#[rstest]
fn node_is_collected_once_at_hover_height(terrain: HeightField) {
    let config = NodeConfig::default();
    let hover = config.hover_height;
    let mut field = ResourceField::new(config);
    field.place(10.0, 10.0, 15, &terrain);
    let y = terrain.sample_height(10.0, 10.0);

    let first = field.check_collection(Vec3::new(10.0, y, 10.0), 5.0);
    assert_eq!(
        first,
        vec![CollectedNode {
            position: Vec3::new(10.0, y + hover, 10.0),
            value: 15,
        }]
    );
    assert!(field.check_collection(Vec3::new(10.0, y, 10.0), 5.0).is_empty());
}

#[rstest]
fn sweeping_the_world_collects_each_node_at_most_once(terrain: HeightField) {
    let mut field = ResourceField::new(NodeConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    field.populate(50, 1000.0, &terrain, &mut rng);
    let total: u32 = field.nodes().iter().map(|node| node.value).sum();

    let mut gathered = Vec::new();
    let targets: Vec<Vec3> = field.nodes().iter().map(|node| node.position).collect();
    for _ in 0..3 {
        for &target in &targets {
            gathered.extend(field.check_collection(target, 3.0));
        }
    }
    assert_eq!(gathered.len(), 50);
    assert_eq!(gathered.iter().map(|node| node.value).sum::<u32>(), total);
    assert_eq!(field.remaining(), 0);
}

#[rstest]
fn population_is_reproducible(terrain: HeightField) {
    let mut a = ResourceField::new(NodeConfig::default());
    let mut b = ResourceField::new(NodeConfig::default());
    a.populate(20, 1000.0, &terrain, &mut ChaCha8Rng::seed_from_u64(8));
    b.populate(20, 1000.0, &terrain, &mut ChaCha8Rng::seed_from_u64(8));
    assert_eq!(a, b);
}
