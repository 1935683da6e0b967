// Image generation: three upstream providers behind one trait, tried in a
// fixed order, with local fallback art when all of them fail.

pub mod clipdrop;
pub mod fallback_art;
pub mod handlers;
pub mod horde;
pub mod orchestrator;
pub mod poll;
pub mod provider;
pub mod stability;
