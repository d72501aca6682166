use std::cmp::Reverse;

/// Counts `codes` in first-occurrence order, then ranks by descending count.
///
/// The sort is stable, so codes with equal counts keep the order in which
/// they first appeared. Which code sits on top of a tied ranking therefore
/// depends only on input order, never on hash iteration order.
fn ranked_counts<'a>(codes: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for code in codes {
        match counts.iter_mut().find(|(seen, _)| *seen == code) {
            Some((_, n)) => *n += 1,
            None => counts.push((code, 1)),
        }
    }
    counts.sort_by_key(|&(_, n)| Reverse(n));
    counts
}

/// Chooses one category code from the three tools' parsed calls for a gene.
///
/// A majority vote over all three lists decides first; each list entry is
/// one vote, so multi-family calls weight their categories. On a tie at the
/// top, the vote is recounted over the HMMER and dbCAN_sub lists alone; if
/// those two still tie, dbCAN_sub's own first call wins. The dbCAN_sub
/// fallback is one-sided; there is no symmetric HMMER fallback.
///
/// # Panics
///
/// Panics when all three lists are empty. Callers exclude genes called by
/// fewer than two tools before resolving, so a filtered pipeline never
/// reaches this.
pub fn decide_family(hmmer: &[String], dbcan_sub: &[String], diamond: &[String]) -> String {
    let combined: Vec<&str> = hmmer
        .iter()
        .chain(dbcan_sub)
        .chain(diamond)
        .map(String::as_str)
        .collect();
    assert!(
        !combined.is_empty(),
        "consensus requested for a gene with no parsed tool calls"
    );

    let ranked = ranked_counts(combined);
    if ranked.len() == 1 {
        return ranked[0].0.to_string();
    }
    if ranked[0].1 > ranked[1].1 {
        return ranked[0].0.to_string();
    }

    // Tied across all three tools: drop DIAMOND and recount over the two
    // higher-precision tools.
    let restricted = ranked_counts(hmmer.iter().chain(dbcan_sub).map(String::as_str));
    assert!(
        !restricted.is_empty(),
        "vote tied with empty HMMER and dbCAN_sub calls"
    );
    if restricted.len() > 1 && restricted[0].1 == restricted[1].1 {
        match dbcan_sub.first() {
            Some(code) => code.clone(),
            None => restricted[0].0.to_string(),
        }
    } else {
        restricted[0].0.to_string()
    }
}
