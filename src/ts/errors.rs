use crate::ts::lang::Lang;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("failed to set {lang} grammar on parser")]
    LanguageSet { lang: Lang },

    #[error("failed to parse {lang} source")]
    ParseFailed { lang: Lang },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
