pub mod catalog;
pub mod providers;

pub use catalog::{merge_videos, CatalogRepository};
pub use providers::{CatalogApi, MovieList, SeriesList, TmdbClient};
