use axum::extract::State;

use crate::AppState;
use crate::resilience::CircuitBreakerError;

pub const FALLBACK_RESPONSE: &str = "Fallback response";

/// 总是失败的演示接口，由熔断器兜底
#[axum::debug_handler]
pub async fn risky_endpoint(State(state): State<AppState>) -> String {
    let result = state
        .breaker
        .call(|| async { Err::<String, _>("Simulated failure") })
        .await;

    match result {
        Ok(body) => body,
        Err(CircuitBreakerError::Open(name)) => {
            tracing::debug!("Circuit '{}' open, serving fallback", name);
            FALLBACK_RESPONSE.to_string()
        }
        Err(CircuitBreakerError::Failure(e)) => {
            tracing::warn!("Circuit '{}' call failed: {}", state.breaker.name(), e);
            FALLBACK_RESPONSE.to_string()
        }
    }
}
