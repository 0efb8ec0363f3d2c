//! Builders selecting the storage adapter behind the HTTP ports.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use bp_backend::domain::MeasurementService;
use bp_backend::domain::ports::MeasurementRepository;
use bp_backend::inbound::http::state::HttpState;
use bp_backend::outbound::memory::InMemoryMeasurementRepository;
use bp_backend::outbound::persistence::DieselMeasurementRepository;

use super::ServerConfig;

fn state_over<R>(repo: R) -> HttpState
where
    R: MeasurementRepository + 'static,
{
    let service = Arc::new(MeasurementService::new(
        Arc::new(repo),
        Arc::new(DefaultClock),
    ));
    HttpState::new(service.clone(), service)
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over the in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!(storage = "postgres", "measurement storage selected");
            state_over(DieselMeasurementRepository::new(pool.clone()))
        }
        None => {
            info!(storage = "memory", "measurement storage selected");
            state_over(InMemoryMeasurementRepository::new())
        }
    };
    web::Data::new(state)
}
