//! Abundance ordering of clusters.
//!
//! Clusters sort by descending size, then ascending id. Ids compare as plain
//! strings (byte order), so `"B"` sorts before `"a"`.

use std::cmp::Ordering;

use crate::core::cluster::Cluster;

/// Whether `a` is emitted strictly before `b`
#[must_use]
pub fn precedes(a: &Cluster, b: &Cluster) -> bool {
    match a.size.cmp(&b.size) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => a.id < b.id,
    }
}

/// Comparator for [`slice::sort_by`] consistent with [`precedes`]
#[must_use]
pub fn by_abundance(a: &Cluster, b: &Cluster) -> Ordering {
    b.size.cmp(&a.size).then_with(|| a.id.cmp(&b.id))
}

/// Stable sort; clusters equal in both size and id keep their relative order.
pub fn sort_by_abundance(clusters: &mut [Cluster]) {
    clusters.sort_by(by_abundance);
}
