use axum::{routing::get, Router};

use super::handlers::{
    create_book, delete_book, get_book, list_books, patch_book, update_book, SharedStore,
};

/// Book routes, relative to the module mount path.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book)
                .put(update_book)
                .patch(patch_book)
                .delete(delete_book),
        )
        .with_state(store)
}
