use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{AccountId, Flow};

/// Features of the alerted account, computed over the full window graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFeatures {
    pub account_id: AccountId,
    pub alert_date: NaiveDate,
    pub out_degree: usize,
    pub inbound: Flow,
    pub outbound: Flow
}

/// Features of one neighbor relative to its alerted account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborFeatures {
    pub account_id: AccountId,
    pub hop_distance: u32,
    pub total_inbound: Flow,
    /// Flow on the edge from the alerted account, zero when there is none.
    pub direct_inbound: Flow,
    /// `total_inbound - direct_inbound`.
    pub indirect_inbound: Flow,
    pub outbound: Flow,
    pub degree: usize,
    pub in_degree: usize,
    pub out_degree: usize
}

impl NeighborFeatures {
    pub fn has_negative_indirect(&self) -> bool {
        self.indirect_inbound.is_negative()
    }
}

/// One output sample: a neighbor's features next to its alerted account's features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRow {
    pub account_id: AccountId,
    pub hop_distance: u32,
    pub total_inbound_amount: Decimal,
    pub direct_inbound_amount: Decimal,
    pub indirect_inbound_amount: Decimal,
    pub total_inbound_count: i64,
    pub direct_inbound_count: i64,
    pub indirect_inbound_count: i64,
    pub total_outbound_amount: Decimal,
    pub total_outbound_count: i64,
    pub total_degree: usize,
    pub in_degree: usize,
    pub out_degree: usize,
    /// Number of rows in the whole table sharing this `account_id`.
    pub popularity: usize,
    pub source_account_id: AccountId,
    pub alert_date: NaiveDate,
    pub source_out_degree: usize,
    pub source_total_inbound_amount: Decimal,
    pub source_total_inbound_count: i64,
    pub source_total_outbound_amount: Decimal,
    pub source_total_outbound_count: i64
}

impl FeatureRow {
    /// CSV header, in field order.
    pub const COLUMNS: [&'static str; 21] = [
        "account_id",
        "hop_distance",
        "total_inbound_amount",
        "direct_inbound_amount",
        "indirect_inbound_amount",
        "total_inbound_count",
        "direct_inbound_count",
        "indirect_inbound_count",
        "total_outbound_amount",
        "total_outbound_count",
        "total_degree",
        "in_degree",
        "out_degree",
        "popularity",
        "source_account_id",
        "alert_date",
        "source_out_degree",
        "source_total_inbound_amount",
        "source_total_inbound_count",
        "source_total_outbound_amount",
        "source_total_outbound_count"
    ];

    /// Merges a neighbor record with its source record. Popularity stays zero until
    /// the whole table is annotated.
    pub fn combine(neighbor: NeighborFeatures, source: &SourceFeatures) -> Self {
        Self {
            account_id: neighbor.account_id,
            hop_distance: neighbor.hop_distance,
            total_inbound_amount: neighbor.total_inbound.amount,
            direct_inbound_amount: neighbor.direct_inbound.amount,
            indirect_inbound_amount: neighbor.indirect_inbound.amount,
            total_inbound_count: neighbor.total_inbound.count,
            direct_inbound_count: neighbor.direct_inbound.count,
            indirect_inbound_count: neighbor.indirect_inbound.count,
            total_outbound_amount: neighbor.outbound.amount,
            total_outbound_count: neighbor.outbound.count,
            total_degree: neighbor.degree,
            in_degree: neighbor.in_degree,
            out_degree: neighbor.out_degree,
            popularity: 0,
            source_account_id: source.account_id.clone(),
            alert_date: source.alert_date,
            source_out_degree: source.out_degree,
            source_total_inbound_amount: source.inbound.amount,
            source_total_inbound_count: source.inbound.count,
            source_total_outbound_amount: source.outbound.amount,
            source_total_outbound_count: source.outbound.count
        }
    }

    pub fn has_negative_indirect(&self) -> bool {
        self.indirect_inbound_amount < Decimal::ZERO || self.indirect_inbound_count < 0
    }
}
