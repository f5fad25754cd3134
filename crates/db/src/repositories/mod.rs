//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Create and update methods
//! validate their DTO before touching the database.

pub mod author_repo;
pub mod book_instance_repo;
pub mod book_repo;
pub mod catalog_repo;
pub mod genre_repo;
pub mod user_repo;

pub use author_repo::AuthorRepo;
pub use book_instance_repo::BookInstanceRepo;
pub use book_repo::BookRepo;
pub use catalog_repo::CatalogRepo;
pub use genre_repo::GenreRepo;
pub use user_repo::UserRepo;
