pub mod batch;
pub mod case;
pub mod config;
pub mod decoder;
pub mod document;
pub mod error;
pub mod interpolate;

pub use batch::*;
pub use case::*;
pub use config::*;
pub use decoder::*;
pub use document::*;
pub use error::*;
pub use interpolate::*;
