pub mod identification_banner;
pub mod mototaxi_vehicle;
pub mod municipal_transport_vehicle;
pub mod taxi_vehicle;
pub mod traits;
pub mod user;
pub mod vehicle_kind;
