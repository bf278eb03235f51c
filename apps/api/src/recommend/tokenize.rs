use std::collections::BTreeSet;

/// Characters that belong inside a token. `+` and `#` keep names like `c++` and `c#` whole.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '#'
}

/// Splits free text into a set of lowercase tokens. Any run of other
/// characters (punctuation, whitespace, non-ASCII) separates tokens.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect()
}
