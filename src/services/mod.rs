/// Business logic services layer
mod detail;
mod favorites;
mod gallery;

pub use detail::{DetailService, DetailView, SummaryState};
pub use favorites::FavoritesStore;
pub use gallery::GalleryService;
