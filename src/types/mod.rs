// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Deployment ids, publish modes, and Maven coordinates.

mod coordinates;
mod id;
mod publish_mode;

pub use coordinates::{Coordinates, CoordinatesError};
pub use id::{DeploymentId, Id};
pub use publish_mode::{ParsePublishModeError, PublishMode};
