//! Formatting and encoding helpers that share the facade's namespace.
//!
//! None of these take part in registry dispatch; they are plain functions
//! over numbers, strings and byte buffers.

pub mod chinese;
pub mod codec;
pub mod time_unit;
pub mod width;
pub mod words;

pub use chinese::{chinese_money_to_number, chinese_to_number};
pub use codec::{
    byte_to_unsigned_int, bytes_to_int, bytes_to_long, bytes_to_short, hex_decode, hex_encode,
    hex_to_str, int_to_byte, int_to_bytes, long_to_bytes, short_to_bytes, str_to_hex,
    str_to_unicode, unicode_to_str,
};
pub use time_unit::{convert_time, TimeUnit};
pub use width::{to_dbc, to_sbc};
pub use words::{format_words, number_to_simple, number_to_words};
