/// The three annotation tools whose per-gene calls are reconciled.
///
/// Each tool encodes its matches differently; `parse_result` knows the
/// encoding for each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Profile-HMM search against family models.
    Hmmer,
    /// Substrate-aware sub-family predictor.
    DbcanSub,
    /// Sequence-similarity search.
    Diamond,
}

impl Tool {
    /// Header of the input column carrying this tool's result string.
    pub fn column(&self) -> &'static str {
        match self {
            Tool::Hmmer => "HMMER",
            Tool::DbcanSub => "dbCAN_sub",
            Tool::Diamond => "DIAMOND",
        }
    }

    /// Parses one raw result string into the category codes it encodes.
    ///
    /// `"N"` is the no-call sentinel and yields an empty list. Otherwise the
    /// string is a `+`-delimited list of family matches, each starting with a
    /// category code and a numeric family id (dbCAN_sub matches additionally
    /// carry an `_e<rank>` suffix). Order and duplicates are preserved.
    /// Tokens that do not fit the tool's encoding are dropped.
    pub fn parse_result(&self, result: &str) -> Vec<String> {
        if result == "N" {
            return Vec::new();
        }
        result
            .split('+')
            .filter_map(|token| self.token_category(token))
            .map(str::to_string)
            .collect()
    }

    fn token_category<'a>(&self, token: &'a str) -> Option<&'a str> {
        let (category, rest) = split_family_prefix(token)?;
        match self {
            // HMMER and DIAMOND allow arbitrary trailing text after the
            // family id, e.g. "GH13(24-350)".
            Tool::Hmmer | Tool::Diamond => Some(category),
            Tool::DbcanSub => {
                let rank = rest.strip_prefix("_e")?;
                if rank.starts_with(|c: char| c.is_ascii_digit()) {
                    Some(category)
                } else {
                    None
                }
            }
        }
    }
}

/// Splits a `<category><digits>` prefix off `token`, returning the category
/// code and whatever follows the digit run. `None` when the token does not
/// start with an alphabetic run followed by at least one digit.
fn split_family_prefix(token: &str) -> Option<(&str, &str)> {
    let alpha = token
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    if alpha == 0 {
        return None;
    }
    let rest = &token[alpha..];
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    Some((&token[..alpha], &rest[digits..]))
}
