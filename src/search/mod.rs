//! Feature search
//!
//! Repeatedly drops the least important trailing features, retrains and
//! predicts, and archives every prediction vector with its validation AUC.

mod archive;
mod driver;

pub use archive::SearchArchive;
pub use driver::{FeatureSearch, SearchReport};
