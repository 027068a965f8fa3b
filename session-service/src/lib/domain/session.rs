pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use models::RefreshTokenRecord;
pub use models::Subject;
pub use service::SessionService;
