use scriptscribbler_engine::{Block, BlockType, Project, Scene};

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_scene(exchanges: usize) -> Scene {
    let mut blocks = vec![
        Block::new(BlockType::SceneHeading, "INT. WAREHOUSE - NIGHT"),
        Block::new(BlockType::Action, "Dust hangs in the flashlight beams."),
    ];
    for i in 0..exchanges {
        let speaker = if i % 2 == 0 { "RUIZ" } else { "CHEN" };
        blocks.push(Block::new(BlockType::Character, speaker));
        if i % 3 == 0 {
            blocks.push(Block::new(BlockType::Parenthetical, "(low)"));
        }
        blocks.push(Block::new(
            BlockType::Dialogue,
            "We should not be here after dark, and you know it.",
        ));
    }
    Scene::new(blocks)
}

#[allow(dead_code)]
pub fn generate_project(scenes: usize, exchanges: usize) -> Project {
    Project::from_scenes((0..scenes).map(|_| generate_scene(exchanges)).collect(), 0)
}
