//! The SNBT literal subsystem: text notation for NBT trees.
//!
//! * [`from_str`] parses a literal into a [`Value`](crate::Value).
//! * [`to_string`], [`to_string_compact`] and [`to_string_pretty`] render
//!   one back; [`Serializer`] exposes the options behind them.
//!
//! The grammar supports the usual SNBT forms: `{key: value}` compounds
//! with bare, quoted or numeric keys, `[a, b]` homogeneous lists,
//! `[B; 1B, 2B]` / `[I; 1, 2]` / `[L; 1L, 2L]` arrays, numbers with
//! `b`/`s`/`l`/`f`/`d` type suffixes, `true`/`false` byte aliases, and
//! single- or double-quoted strings where only the backslash and the
//! enclosing quote may be escaped.

mod parser;
mod serializer;
mod tokenizer;

pub use parser::{from_str, Parser};
pub use serializer::{to_string, to_string_compact, to_string_pretty, Serializer};

pub(crate) use tokenizer::TokenKind;
