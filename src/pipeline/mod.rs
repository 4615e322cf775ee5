//! Pipeline module - the cleaning stage, from raw CSV to published splits

pub mod cleaning;
pub mod encoding;
pub mod error;
pub mod etl;
pub mod loader;
pub mod publish;
pub mod scaling;
pub mod schema;
pub mod split;

pub use cleaning::*;
pub use encoding::*;
pub use error::EtlError;
pub use etl::*;
pub use loader::*;
pub use publish::*;
pub use scaling::*;
pub use schema::*;
pub use split::*;
