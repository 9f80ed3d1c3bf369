use std::sync::Arc;

use resilience::CircuitBreaker;
use service::UserCacheService;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod resilience;
pub mod router;
pub mod routes;
pub mod service;
pub mod worker;

#[cfg(test)]
mod test_support;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserCacheService>,
    pub breaker: Arc<CircuitBreaker>,
}
