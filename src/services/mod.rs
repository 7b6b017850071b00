// Service exports
pub mod images;
pub mod loader;
pub mod table;

pub use images::{breed_folder, gallery_url, image_url};
pub use loader::{LoaderOptions, SchemaError};
pub use table::{parse_table, Table};
