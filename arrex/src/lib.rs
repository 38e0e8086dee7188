// MIT License
//
// Copyright (c) 2024 The arrex authors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! `arrex` is a resizable array of packed, fixed-size records, backed by a
//! single contiguous buffer instead of one heap allocation per element.
//!
//! Every list is bound to a [`Codec`](codec::Codec) that knows how to turn
//! a [`Value`](value::Value) into the fixed number of bytes the list
//! stores and back. A codec can be an *extension* codec wrapping a host
//! type that implements [`Element`](codec::Element) directly (its raw
//! memory *is* the packed record), or a *function* codec built from
//! plain pack/unpack closures, for records that don't map onto a single
//! `Pod` struct. Codecs are looked up by key in a process-wide
//! [registry](registry), the same way struct formats are looked up by
//! format string in the crate this one is descended from.
//!
//! ```
//! use arrex::{list::TypedList, numbers, registry::DtypeKey, value::Value};
//!
//! numbers::install();
//! let codec = arrex::registry::declared(&DtypeKey::Layout("l".into())).unwrap();
//! let mut xs = TypedList::new(codec);
//! xs.append(&Value::I64(1)).unwrap();
//! xs.append(&Value::I64(2)).unwrap();
//! assert_eq!(xs.len(), 2);
//! ```

pub mod buffer;
pub mod codec;
pub mod error;
pub mod layout;
pub mod list;
pub mod numbers;
pub mod registry;
pub mod value;

pub use codec::{Codec, Element};
pub use error::{ArrexError, Result};
pub use list::TypedList;
pub use value::Value;
