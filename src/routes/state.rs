use crate::{db::TitleStore, services::CatalogRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogRepository,
    pub store: TitleStore,
    /// Page size of the favorites and history lists
    pub saved_page_size: u32,
}

impl AppState {
    pub fn new(catalog: CatalogRepository, store: TitleStore, saved_page_size: u32) -> Self {
        Self {
            catalog,
            store,
            saved_page_size,
        }
    }
}
