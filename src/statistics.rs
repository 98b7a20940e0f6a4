//! Pairwise diversity (§ pairwise diversity): an illustrative statistic
//! built directly on the sparse-tree iterator's leaf-count auxiliary.

use crate::error::GenealogyResult;
use crate::flags::TreeFlags;
use crate::newtypes::NodeId;
use crate::trees::TreeSequence;

/// Mean pairwise sequence difference among `samples`: for every mutation,
/// weight it by `count * (|samples| - count)` where `count` is the number
/// of query samples beneath the mutation's node, then normalize by the
/// number of pairs.
pub fn pairwise_diversity(ts: &TreeSequence, samples: &[NodeId]) -> GenealogyResult<f64> {
    let k = samples.len();
    if k < 2 {
        return Err(crate::error::GenealogyError::BadParamValue(
            "pairwise diversity needs at least 2 samples".to_string(),
        ));
    }

    let mut tree = ts.tree_iterator(TreeFlags::SAMPLE_COUNTS);
    tree.set_tracked_leaves(samples)?;
    let mut total = 0.0;
    let mut positioned = tree.first();
    while positioned {
        for row in tree.mutations() {
            let count = tree.num_tracked_leaves(row.node);
            total += (count * (k - count)) as f64;
        }
        positioned = tree.next();
    }

    let num_pairs = (k * (k - 1)) as f64 / 2.0;
    Ok(total / num_pairs)
}
