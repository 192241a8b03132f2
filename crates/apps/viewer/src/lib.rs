pub mod config;
pub mod context;
pub mod loader;
pub mod panel;
pub mod script;

pub use config::{Args, ViewerConfig};
pub use context::AppContext;
pub use loader::{Datasets, LoadError, Loader, Source};
pub use panel::DetailPanel;
