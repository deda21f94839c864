use crate::models::{MarketSide, Mover};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One persisted row of a daily snapshot
///
/// `snapshot_timestamp` is the US Eastern wall-clock time the batch was taken;
/// `ingestion_timestamp` is the UTC time the row was written. Rows are never
/// updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Assigned by the store, `None` before insert
    pub id: Option<i64>,
    pub snapshot_timestamp: NaiveDateTime,
    pub ingestion_timestamp: NaiveDateTime,
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub change: String,
    pub changes_percentage: String,
    pub launch_link: String,
    pub is_gainer: bool,
}

impl SnapshotRecord {
    pub fn from_mover(
        mover: &Mover,
        side: MarketSide,
        snapshot_timestamp: NaiveDateTime,
        ingestion_timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            snapshot_timestamp,
            ingestion_timestamp,
            symbol: mover.symbol.clone(),
            name: mover.name.clone(),
            price: mover.price.clone(),
            change: mover.change.clone(),
            changes_percentage: mover.changes_percentage.clone(),
            launch_link: mover.launch_link(),
            is_gainer: side.is_gainer(),
        }
    }

    /// Back to the in-memory form used for coloring and rendering
    pub fn to_mover(&self) -> Mover {
        Mover {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            price: self.price.clone(),
            change: self.change.clone(),
            changes_percentage: self.changes_percentage.clone(),
            sector: None,
        }
    }

    pub fn side(&self) -> MarketSide {
        MarketSide::from_is_gainer(self.is_gainer)
    }
}

/// Split a day's records into (gainers, losers), keeping their order
pub fn partition_by_side(records: &[SnapshotRecord]) -> (Vec<Mover>, Vec<Mover>) {
    let mut gainers = Vec::new();
    let mut losers = Vec::new();
    for record in records {
        match record.side() {
            MarketSide::Gainers => gainers.push(record.to_mover()),
            MarketSide::Losers => losers.push(record.to_mover()),
        }
    }
    (gainers, losers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn mover(symbol: &str, pct: &str) -> Mover {
        Mover {
            symbol: symbol.to_string(),
            name: format!("{} Inc", symbol),
            price: "10.0".to_string(),
            change: "1.0".to_string(),
            changes_percentage: pct.to_string(),
            sector: Some("Technology".to_string()),
        }
    }

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_from_mover_derives_link_and_flag() {
        let record = SnapshotRecord::from_mover(&mover("abc", "5.0"), MarketSide::Losers, ts(15), ts(19));
        assert_eq!(record.id, None);
        assert!(!record.is_gainer);
        assert_eq!(record.launch_link, "https://financialmodelingprep.com/financial-summary/ABC");
        assert_eq!(record.side(), MarketSide::Losers);
    }

    #[test]
    fn test_partition_by_side() {
        let records = vec![
            SnapshotRecord::from_mover(&mover("A", "5.0"), MarketSide::Gainers, ts(15), ts(19)),
            SnapshotRecord::from_mover(&mover("B", "-3.0"), MarketSide::Losers, ts(15), ts(19)),
            SnapshotRecord::from_mover(&mover("C", "2.0"), MarketSide::Gainers, ts(15), ts(19)),
        ];

        let (gainers, losers) = partition_by_side(&records);
        assert_eq!(gainers.iter().map(|m| m.symbol.as_str()).collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(losers.len(), 1);
        // sector is not persisted
        assert_eq!(losers[0].sector, None);
    }
}
