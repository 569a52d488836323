mod level;
mod load;

pub use level::Level;
pub use load::LevelCatalog;
