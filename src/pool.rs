//! Thread-local parser pooling for performance optimization.
//!
//! Eliminates redundant parser creation by maintaining a thread-local pool
//! of reusable parsers, one per grammar. Creates a parser on first use per
//! thread and language, reuses it for subsequent files.

use crate::ts::{EntityParser, GrammarError, Lang};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static PARSERS: RefCell<HashMap<Lang, EntityParser>> = RefCell::new(HashMap::new());
}

/// Execute function with a pooled parser instance for the given language.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use faultline::pool::with_parser;
/// use faultline::ts::Lang;
///
/// let tree = with_parser(Lang::Rust, |parser| parser.parse("fn main() {}"))??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(lang: Lang, f: F) -> Result<R, GrammarError>
where
    F: FnOnce(&mut EntityParser) -> R,
{
    PARSERS.with(|cell| {
        let mut pool = cell.borrow_mut();
        if !pool.contains_key(&lang) {
            pool.insert(lang, EntityParser::new(lang)?);
        }
        Ok(f(pool
            .get_mut(&lang)
            .expect("parser was just inserted above")))
    })
}
