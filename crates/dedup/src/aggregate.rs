use std::collections::BTreeSet;

use crate::config::DeduplicationConfig;
use crate::error::DedupError;
use crate::registry::LogicalOperator;
use crate::scorer::{score_type, TypeIndex};
use crate::table::Table;

/// Indexes for every configured type, built once per pass.
pub fn build_indexes(
    config: &DeduplicationConfig,
    table: &Table,
) -> Result<Vec<TypeIndex>, DedupError> {
    config.types.iter().map(|ty| TypeIndex::build(ty, table)).collect()
}

/// Per-candidate count of configured types that match `reference`.
/// Each type contributes at most 1 regardless of how many of its columns matched.
pub fn duplicate_scores(
    indexes: &[TypeIndex],
    table: &Table,
    reference: usize,
) -> Result<Vec<u32>, DedupError> {
    let width = table.original_rows().last().map_or(0, |&r| r + 1);
    let mut scores = vec![0u32; width];
    for index in indexes {
        for candidate in score_type(index, table, reference)? {
            scores[candidate] += 1;
        }
    }
    Ok(scores)
}

/// Apply the overall operator to a score vector.
pub fn verdict(
    operator: LogicalOperator,
    type_count: usize,
    scores: &[u32],
    reference: usize,
) -> BTreeSet<usize> {
    if type_count == 0 {
        return BTreeSet::new();
    }
    let required = type_count as u32;
    scores
        .iter()
        .enumerate()
        .filter(|&(candidate, &score)| {
            candidate != reference
                && match operator {
                    LogicalOperator::Or => score > 0,
                    LogicalOperator::And => score == required,
                }
        })
        .map(|(candidate, _)| candidate)
        .collect()
}

/// Duplicates of `reference` under the whole config.
pub fn score_row(
    config: &DeduplicationConfig,
    indexes: &[TypeIndex],
    table: &Table,
    reference: usize,
) -> Result<BTreeSet<usize>, DedupError> {
    let scores = duplicate_scores(indexes, table, reference)?;
    Ok(verdict(config.operator, config.types.len(), &scores, reference))
}
