use crate::env::errors::EnvError;
use crate::env::types::Step;
use rand::Rng;

/// An environment driven by a caller-owned random source.
///
/// The RNG is passed in rather than owned so that a training run can draw
/// actions and rewards from one seeded stream.
pub trait Env {
    type Obs: Clone;
    type Act: Clone;

    fn reset(&mut self) -> Result<Self::Obs, EnvError>;
    fn step<R: Rng + ?Sized>(
        &mut self,
        act: &Self::Act,
        rng: &mut R,
    ) -> Result<Step<Self::Obs>, EnvError>;
    fn num_actions(&self) -> usize;
}
