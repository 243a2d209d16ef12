//! Infrastructure adapters: persistence, codecs, compression, telemetry.

pub mod codec;
pub mod compress;
pub mod error;
pub mod storage;
pub mod telemetry;
