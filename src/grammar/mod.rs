//! Composable grammar engine over token sequences.
//!
//! Grammars are closed [`ParseElement`] trees: compiled once, immutable and
//! acyclic, shared read-only across every sentence they are applied to.
//! Matching is a pure function of `(element, tokens, position)` with no
//! hidden state; a failed match is `None`, never an error.
//!
//! Construction is where all validation happens. Leaf constructors that parse
//! external input ([`lit`], [`caseless`], [`re`]) return `Result` so that a
//! bad pattern is rejected before the grammar is ever used.
//!
//! Elements compose with `+` (sequence) and `|` (ordered alternative):
//!
//! ```ignore
//! let phrase = (caseless("melting point")? | caseless("mp")?)
//!     + skip_to(group("value", re(r"^\d")?));
//! ```

mod element;
mod result;
mod scan;

pub use element::{
    caseless, first, group, hide, lit, one_or_more, opt, re, seq, skip_to, zero_or_more,
    ParseElement,
};
pub use result::ParseResult;
pub use scan::Scan;
