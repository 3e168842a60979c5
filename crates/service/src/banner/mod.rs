pub mod memory;
pub mod repository;
pub mod service;

pub use memory::MemoryBannerRepository;
pub use repository::{BannerRepository, SeaOrmBannerRepository};
pub use service::{BannerInput, BannerService};

/// Conflict message for a duplicate title, shared by the application-layer
/// check and the unique-index backstop in the repositories.
pub const TITLE_TAKEN: &str = "Title is already registered";
