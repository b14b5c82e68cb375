// Domain-level errors raised while advancing the simulation.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// An entity refers to a body that is no longer in the physics world.
    MissingBody { entity: &'static str, id: u64 },
    /// A body reached a NaN/inf position or velocity.
    NonFinite { entity: &'static str, id: u64 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::MissingBody { entity, id } => write!(f, "{entity} {id} has no body"),
            SimError::NonFinite { entity, id } => write!(f, "{entity} {id} has non-finite state"),
        }
    }
}

impl std::error::Error for SimError {}
