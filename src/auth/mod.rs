pub mod gateway;
pub mod middleware;

pub use gateway::{AuthGateway, AuthSession, RestAuthGateway};
pub use middleware::{validate_bearer, AuthenticatedUser};

#[cfg(test)]
pub use gateway::MockAuthGateway;
