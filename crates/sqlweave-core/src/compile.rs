//! Positional placeholder compiler.
//!
//! Rewrites statements written with `?` placeholders into the `$1`, `$2`, ...
//! form expected by PostgreSQL-style drivers. A run of exactly two `?` is an
//! escape for a literal `?` and does not consume an ordinal; every other run
//! yields one marker per `?`.
//!
//! ```rust
//! use sqlweave_core::compile;
//!
//! assert_eq!(compile("a ?? b ? c"), "a ? b $1 c");
//! assert_eq!(compile("?????"), "$1$2$3$4$5");
//! ```

use std::borrow::Cow;

use once_cell::sync::Lazy;

/// Highest ordinal the wire protocol can address.
pub const MAX_PARAMETERS: usize = 65535;

/// `$1` to `$65535` stored back to back, with `ends[n]` marking the end of
/// marker `n`.
struct Markers {
    text: String,
    ends: Vec<usize>,
}

impl Markers {
    fn build() -> Self {
        // "$" plus up to five digits for each marker.
        let mut text = String::with_capacity(MAX_PARAMETERS * 6);
        let mut ends = Vec::with_capacity(MAX_PARAMETERS + 1);
        ends.push(0);
        let mut digits = itoa::Buffer::new();
        for ordinal in 1..=MAX_PARAMETERS {
            text.push('$');
            text.push_str(digits.format(ordinal));
            ends.push(text.len());
        }
        Self { text, ends }
    }

    fn get(&self, ordinal: usize) -> Option<&str> {
        let start = *self.ends.get(ordinal.checked_sub(1)?)?;
        let end = *self.ends.get(ordinal)?;
        self.text.get(start..end)
    }
}

static MARKERS: Lazy<Markers> = Lazy::new(Markers::build);

fn push_marker(out: &mut String, ordinal: usize) {
    if let Some(marker) = MARKERS.get(ordinal) {
        out.push_str(marker);
    } else {
        // Past the protocol limit; the driver rejects the statement.
        out.push('$');
        out.push_str(itoa::Buffer::new().format(ordinal));
    }
}

/// Replaces every unescaped `?` with its 1-based ordinal marker.
///
/// A run of exactly two `?` collapses into a literal `?`. Input without any
/// `?` is returned borrowed. Placeholder counts above [`MAX_PARAMETERS`] are
/// rendered but not rejected.
#[must_use]
pub fn compile(sql: &str) -> Cow<'_, str> {
    let Some(first) = sql.find('?') else {
        return Cow::Borrowed(sql);
    };

    let mut out = String::with_capacity(sql.len() + sql.len() / 2);
    out.push_str(&sql[..first]);
    let mut rest = &sql[first..];
    let mut ordinal = 0;

    while let Some(pos) = rest.find('?') {
        out.push_str(&rest[..pos]);
        let run = &rest[pos..];
        let tail = run.trim_start_matches('?');
        // '?' is one byte, so the byte distance is the run length.
        let len = run.len() - tail.len();
        if len == 2 {
            out.push('?');
        } else {
            for _ in 0..len {
                ordinal += 1;
                push_marker(&mut out, ordinal);
            }
        }
        rest = tail;
    }
    out.push_str(rest);

    Cow::Owned(out)
}
