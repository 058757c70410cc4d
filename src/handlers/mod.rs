pub mod combine;
pub mod health;
pub mod static_files;

pub use combine::*;
pub use health::*;
pub use static_files::*;
