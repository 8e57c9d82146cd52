pub mod converters;
pub mod watcher;
