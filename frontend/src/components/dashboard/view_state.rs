//! 仪表盘展示状态
//!
//! 每次切换时间范围或手动刷新都会签发一个带序号的请求凭证，
//! 只有最新凭证对应的响应会被采纳，且整体替换之前的数据。

use inventory_shared::{DashboardStats, StockStatusShare, TimeRange};

/// 一次统计请求的凭证
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsTicket {
    pub seq: u64,
    pub range: TimeRange,
}

/// 响应合并结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsUpdate {
    Loaded,
    /// 请求失败，数据已清空
    Failed,
    /// 响应已过期，被忽略
    Stale,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub range: TimeRange,
    pub stats: Option<DashboardStats>,
    pub loading: bool,
    seq: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self) -> StatsTicket {
        self.seq += 1;
        self.loading = true;
        StatsTicket {
            seq: self.seq,
            range: self.range,
        }
    }

    /// 以当前时间范围重新拉取
    pub fn refresh(&mut self) -> StatsTicket {
        self.issue()
    }

    pub fn select_range(&mut self, range: TimeRange) -> StatsTicket {
        self.range = range;
        self.issue()
    }

    /// 合并响应；`Err` 表示请求失败
    pub fn apply<E>(&mut self, ticket: StatsTicket, result: Result<DashboardStats, E>) -> StatsUpdate {
        if ticket.seq != self.seq {
            return StatsUpdate::Stale;
        }
        self.loading = false;
        match result {
            Ok(stats) => {
                self.stats = Some(stats);
                StatsUpdate::Loaded
            }
            Err(_) => {
                self.stats = None;
                StatsUpdate::Failed
            }
        }
    }

    /// 库存状态占比（总数为 0 时全部为 0）
    pub fn stock_shares(&self) -> StockStatusShare {
        self.stats
            .as_ref()
            .map(|stats| stats.stock_status.shares())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_shared::StockStatus;

    fn stats(total_products: u64) -> DashboardStats {
        DashboardStats {
            total_products,
            ..Default::default()
        }
    }

    #[test]
    fn newest_response_wins() {
        let mut state = DashboardState::new();
        let week = state.refresh();
        let year = state.select_range(TimeRange::Year);
        assert_eq!(year.range, TimeRange::Year);

        assert_eq!(state.apply::<()>(year, Ok(stats(3))), StatsUpdate::Loaded);
        assert_eq!(state.apply::<()>(week, Ok(stats(99))), StatsUpdate::Stale);
        assert_eq!(state.stats.as_ref().map(|s| s.total_products), Some(3));
        assert!(!state.loading);
    }

    #[test]
    fn response_replaces_every_figure() {
        let mut state = DashboardState::new();
        let first = state.refresh();
        let mut full = stats(5);
        full.low_stock_items = 2;
        full.stock_status = StockStatus {
            in_stock: 3,
            low_stock: 1,
            out_of_stock: 0,
        };
        state.apply::<()>(first, Ok(full));

        let second = state.select_range(TimeRange::Month);
        state.apply::<()>(second, Ok(stats(1)));
        let current = state.stats.as_ref().unwrap();
        assert_eq!(current.low_stock_items, 0);
        assert_eq!(current.stock_status, StockStatus::default());
    }

    #[test]
    fn failure_clears_figures() {
        let mut state = DashboardState::new();
        let ok = state.refresh();
        state.apply::<()>(ok, Ok(stats(5)));
        let failing = state.refresh();
        assert_eq!(state.apply(failing, Err("boom")), StatsUpdate::Failed);
        assert_eq!(state.stats, None);
    }

    #[test]
    fn shares_are_zero_without_items() {
        let state = DashboardState::new();
        assert_eq!(state.stock_shares(), StockStatusShare::default());
    }
}
