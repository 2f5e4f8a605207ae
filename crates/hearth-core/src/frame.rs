use crate::registry::Generation;

/// Frame timing snapshot.
///
/// `fixed_alpha` is the leftover fraction of a fixed step in [0..1), for render
/// smoothing. `scene_generation` is the registry generation the frame ran under;
/// it changes after every scene reset.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub frame_index: u64,
    pub dt: f32,
    pub fixed_dt: f32,
    pub fixed_alpha: f32,
    pub fixed_steps: u32,
    pub scene_generation: Generation,
}
