//! GPU-ready instance records for particle rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::ParticleEffect;
use crate::sim::particles::Rgb;

/// One filled circle, instanced by the host's particle pass
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    /// Linear RGBA, straight alpha
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: [x, y],
            radius,
            color,
        }
    }
}

/// Convert an 8-bit color and alpha to normalized RGBA
pub fn rgba(color: Rgb, alpha: u8) -> [f32; 4] {
    let [r, g, b] = color;
    [
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(alpha) / 255.0,
    ]
}

/// Colors for game elements
pub mod colors {
    pub const TRAIL: [f32; 4] = [0.39, 0.39, 0.39, 1.0];
    pub const GRADIENT_TOP: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const GRADIENT_BOTTOM: [f32; 4] = [0.0, 0.0, 0.2, 1.0];
}

/// Flatten every visible particle into instance records.
/// Fully transparent particles are skipped.
pub fn particle_instances(effects: &[ParticleEffect]) -> Vec<ParticleInstance> {
    effects
        .iter()
        .flat_map(|effect| effect.particles.iter())
        .filter(|p| p.alpha > 0)
        .map(|p| ParticleInstance::new(p.pos.x, p.pos.y, p.size, rgba(p.color, p.alpha)))
        .collect()
}
