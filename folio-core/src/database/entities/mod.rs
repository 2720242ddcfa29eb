pub mod files;
pub mod nodes;
