mod import;
mod parser;

pub use import::{ImportBlocklistUseCase, ImportOutcome, IMPORT_CHUNK_SIZE};
pub use parser::{parse_blocklist, parse_blocklist_line};
