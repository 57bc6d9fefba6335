//! Configuration files and URL lists.
mod apply;
mod loader;
pub mod types;
mod url_list;


pub use apply::apply_config;
pub use loader::load_config;
pub use types::ConfigFile;
pub use url_list::load_url_list;

#[cfg(test)]
pub(crate) use loader::load_config_file;
