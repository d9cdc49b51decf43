pub mod hats;
pub mod logging;
pub mod settings;
