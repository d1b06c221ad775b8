pub mod events;
pub mod file_store;
pub mod repository;
pub mod seaorm;
pub mod service;

pub use events::{ItemAction, ItemEvent, ItemEvents};
pub use file_store::ItemFileStore;
pub use repository::{CreateItemInput, Item, ItemFields, ItemPatch, ItemStore};
pub use seaorm::SeaOrmItemStore;
pub use service::ItemService;
