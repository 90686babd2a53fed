pub mod block;
pub mod scene;

pub use block::{Block, BlockType};
pub use scene::{Project, Scene};
