//! Length budgeting for prompt/response pairs.

use promptloom_core::TokenId;

/// Split `max_len` between a source and a target of the given lengths.
///
/// The target receives its proportional share, raised to at least
/// `reserved_label_len`; the source gets what is left. Neither side is
/// granted more than it has, and the sum never exceeds `max_len`.
pub fn infer_max_len(
    source_len: usize,
    target_len: usize,
    max_len: usize,
    reserved_label_len: usize,
) -> (usize, usize) {
    let total = source_len + target_len;
    if max_len == 0 || total == 0 {
        return (0, 0);
    }

    let proportional = (max_len as u128 * target_len as u128 / total as u128) as usize;
    let max_target = proportional
        .max(reserved_label_len)
        .min(target_len)
        .min(max_len);
    let max_source = (max_len - max_target).min(source_len);
    (max_source, max_target)
}

/// Pair encoded turns two at a time and truncate them to `cutoff_len`.
///
/// Pairs are accepted until the running total reaches the cutoff; each
/// pair is clipped to the remaining headroom. A pair clipped down to zero
/// tokens is still returned.
///
/// `encoded` must hold an even number of entries; a trailing unpaired
/// entry is ignored.
pub fn make_pairs(
    encoded: Vec<Vec<TokenId>>,
    cutoff_len: usize,
    reserved_label_len: usize,
) -> Vec<(Vec<TokenId>, Vec<TokenId>)> {
    let mut pairs = Vec::with_capacity(encoded.len() / 2);
    let mut total = 0usize;
    let mut turns = encoded.into_iter();

    while let (Some(mut source), Some(mut target)) = (turns.next(), turns.next()) {
        if total >= cutoff_len {
            break;
        }
        let (max_source, max_target) = infer_max_len(
            source.len(),
            target.len(),
            cutoff_len - total,
            reserved_label_len,
        );
        source.truncate(max_source);
        target.truncate(max_target);
        total += source.len() + target.len();
        pairs.push((source, target));
    }

    pairs
}
