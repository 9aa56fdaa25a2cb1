pub mod artifacts;
pub mod error;
pub mod executor;
pub mod generator;
pub mod locator;
pub mod metrics;

pub use artifacts::{Artifact, ArtifactStore};
pub use error::GenerationError;
pub use executor::CommandExecutor;
pub use generator::BoxGenerator;
pub use locator::{
    derive_candidates, Candidate, CandidateLocator, ExecutableLocator, Platform, SearchEnvironment,
};
pub use self::metrics::{get_metrics, init_metrics};
