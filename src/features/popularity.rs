use std::collections::HashMap;

use crate::models::FeatureRow;

/// Sets every row's `popularity` to the number of rows in `rows` that share its
/// neighbor `account_id`.
///
/// Occurrences are counted, not distinct alert accounts: an account alerted on two
/// dates contributes once per date.
pub fn annotate_popularity(mut rows: Vec<FeatureRow>) -> Vec<FeatureRow> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for row in &rows {
        *counts.entry(row.account_id.clone()).or_insert(0) += 1;
    }

    for row in &mut rows {
        row.popularity = counts.get(&row.account_id).copied().unwrap_or(0);
    }

    rows
}
