//! Application Layer
//!
//! Use cases of the lookup core: cache-aside repositories, per-kind
//! lookup services and the facade consumed by the HTTP adapter.

pub mod hybrid_repository;
pub mod location_facade;
pub mod location_service;

pub use hybrid_repository::HybridLocationRepository;
pub use location_facade::LocationFacade;
pub use location_service::LocationService;
