pub mod effects;
pub mod player;

pub use effects::EffectPreset;
pub use player::{EffectTuning, Player};
