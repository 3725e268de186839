//! Wire protocol for Tradewind.
//!
//! This crate defines what travels between a client and the authoritative
//! server:
//!
//! - **Elements** ([`WireElement`], [`Attributes`]): the tagged,
//!   string-attributed tree every command and reply is expressed in.
//! - **Outcomes** ([`Outcome`], [`ClientError`]): what a handled command
//!   turns into.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how elements become bytes.
//! - **Errors** ([`ProtocolError`]): failures before a frame becomes a
//!   message.
//!
//! # Architecture
//!
//! ```text
//! bytes → WireElement → Message (tradewind) → Outcome → WireElement → bytes
//! ```
//!
//! Nothing here knows what a unit or a goods type is.

mod codec;
mod error;
mod outcome;
mod types;
mod wire;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use outcome::{
    ClientError, ERROR_TAG, Outcome, PROTOCOL_MESSAGE_ID, REJECT_MESSAGE_ID, UPDATE_TAG,
    protocol_error_element,
};
pub use types::PlayerId;
pub use wire::{Attributes, WireElement};
