//! Pool ledger primitives.
//! Stable, protocol-neutral, behavior-free.
//!
//! Rule: identifiers are fixed-size values, never strings.

pub mod codec;
pub mod errors;
pub mod primitives;

pub use codec::{decode_uvarint, encode_uvarint, ByteReader, MAX_UVARINT_LEN};
pub use errors::{CodecError, CodecResult};
pub use primitives::{Address, Amount, AppId, AssetId, APP_ADDRESS_DOMAIN};
