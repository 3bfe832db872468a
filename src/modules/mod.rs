pub mod books;

use std::sync::Arc;

use bookshelf_kernel::ModuleRegistry;
use sqlx::PgPool;

/// Register all application modules, wiring each to the shared pool
pub fn register_all(registry: &mut ModuleRegistry, pool: &PgPool) -> anyhow::Result<()> {
    let book_store = Arc::new(books::store::PgBookStore::new(pool.clone()));
    registry.register(books::create_module(book_store))?;
    Ok(())
}
