/// Greedy closest-color tile assignment
pub mod assignment;
/// Overlay construction and alpha compositing
pub mod blend;
/// Mosaic assembly pipeline
pub mod compositor;
/// Tile size and grid planning
pub mod planner;
