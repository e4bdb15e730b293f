//! Line-level complexity counting.
//!
//! The score is a crude decision-point count, not McCabe complexity:
//! - +1 for each `if(`, `while(`, `for(`, `switch(`, `catch(`
//!   (whitespace before the parenthesis allowed)
//! - +1 for each `else if`
//! - +1 for each `&&` and each `||`
//!
//! A file starts at 1. `else if (` scores both the `else if` and the `if (`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::language::COMPLEXITY_CONSTRUCTS;

/// Starting score of every file.
pub const BASE_COMPLEXITY: u32 = 1;

lazy_static! {
    static ref CONSTRUCT_RE: Regex = Regex::new(&format!(
        r"\b(?:{})\s*\(",
        COMPLEXITY_CONSTRUCTS.join("|")
    ))
    .unwrap();
    static ref ELSE_IF_RE: Regex = Regex::new(r"\belse\s+if\b").unwrap();
}

/// Decision points contributed by a single line.
pub fn line_complexity(line: &str) -> u32 {
    let constructs = CONSTRUCT_RE.find_iter(line).count();
    let else_ifs = ELSE_IF_RE.find_iter(line).count();
    let logical = line.matches("&&").count() + line.matches("||").count();
    (constructs + else_ifs + logical) as u32
}
