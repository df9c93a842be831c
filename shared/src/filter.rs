//! 列表筛选 (Status Filters)
//!
//! 所有筛选都只借用已获取的集合，从不修改它；切换标签只是换一个谓词。

use crate::models::{Bill, BillStatus, Delivery, DeliveryStatus, VerificationStatus};

/// 可按某种状态筛选的条目
pub trait HasStatus<S> {
    fn status_key(&self) -> S;
}

impl HasStatus<BillStatus> for Bill {
    fn status_key(&self) -> BillStatus {
        self.status
    }
}

impl HasStatus<DeliveryStatus> for Delivery {
    fn status_key(&self) -> DeliveryStatus {
        self.status
    }
}

impl HasStatus<VerificationStatus> for Delivery {
    fn status_key(&self) -> VerificationStatus {
        self.verification_status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: Copy + PartialEq> StatusFilter<S> {
    pub fn matches<T: HasStatus<S>>(&self, item: &T) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => item.status_key() == *status,
        }
    }

    pub fn apply<'a, T: HasStatus<S>>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }

    pub fn count<T: HasStatus<S>>(&self, items: &[T]) -> usize {
        items.iter().filter(|item| self.matches(*item)).count()
    }
}

impl StatusFilter<DeliveryStatus> {
    /// 历史接口 `?status=` 的取值；`All` 不带查询参数
    pub fn query_value(&self) -> Option<DeliveryStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

// =========================================================
// 筛选标签 (Filter Tabs)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTab<S: 'static> {
    pub label: &'static str,
    pub filter: StatusFilter<S>,
    /// 标签上是否显示条目数量
    pub counted: bool,
}

impl<S: 'static> FilterTab<S> {
    const fn new(label: &'static str, filter: StatusFilter<S>, counted: bool) -> Self {
        Self {
            label,
            filter,
            counted,
        }
    }
}

pub const BILL_TABS: &[FilterTab<BillStatus>] = &[
    FilterTab::new("All", StatusFilter::All, true),
    FilterTab::new("Unassigned", StatusFilter::Only(BillStatus::Unassigned), true),
    FilterTab::new("Assigned", StatusFilter::Only(BillStatus::Assigned), true),
    FilterTab::new("Delivered", StatusFilter::Only(BillStatus::Delivered), true),
];

pub const ROUTE_TABS: &[FilterTab<DeliveryStatus>] = &[
    FilterTab::new("All", StatusFilter::All, false),
    FilterTab::new("Pending", StatusFilter::Only(DeliveryStatus::Pending), false),
    FilterTab::new("Delivered", StatusFilter::Only(DeliveryStatus::Delivered), false),
    FilterTab::new("Failed", StatusFilter::Only(DeliveryStatus::Failed), false),
];

pub const TRACKING_TABS: &[FilterTab<DeliveryStatus>] = ROUTE_TABS;

/// 历史页由服务端筛选；"Completed" 对应 `delivered`
pub const HISTORY_TABS: &[FilterTab<DeliveryStatus>] = &[
    FilterTab::new("All", StatusFilter::All, false),
    FilterTab::new("Completed", StatusFilter::Only(DeliveryStatus::Delivered), false),
    FilterTab::new("Pending", StatusFilter::Only(DeliveryStatus::Pending), false),
    FilterTab::new("Failed", StatusFilter::Only(DeliveryStatus::Failed), false),
];

pub const VERIFICATION_TABS: &[FilterTab<VerificationStatus>] = &[
    FilterTab::new("All", StatusFilter::All, false),
    FilterTab::new("Pending", StatusFilter::Only(VerificationStatus::Pending), true),
    FilterTab::new("Verified", StatusFilter::Only(VerificationStatus::Verified), true),
    FilterTab::new("Rejected", StatusFilter::Only(VerificationStatus::Rejected), true),
];

/// 核验页默认停留在待核验标签
pub const DEFAULT_VERIFICATION_FILTER: StatusFilter<VerificationStatus> =
    StatusFilter::Only(VerificationStatus::Pending);

// =========================================================
// 历史汇总
// =========================================================

/// 历史页顶部的统计；`pending` 同时计入 `assigned`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistorySummary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: usize,
}

impl HistorySummary {
    pub fn from_deliveries(deliveries: &[Delivery]) -> Self {
        deliveries
            .iter()
            .fold(Self::default(), |mut acc, delivery| {
                acc.total += 1;
                match delivery.status {
                    DeliveryStatus::Delivered => acc.completed += 1,
                    DeliveryStatus::Pending | DeliveryStatus::Assigned => acc.pending += 1,
                    DeliveryStatus::Failed => acc.failed += 1,
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bills() -> Vec<Bill> {
        serde_json::from_value(json!([
            { "_id": "1", "accountNumber": "A1", "customerName": "C1", "address": "X", "status": "unassigned" },
            { "_id": "2", "accountNumber": "A2", "customerName": "C2", "address": "Y", "status": "assigned" },
            { "_id": "3", "accountNumber": "A3", "customerName": "C3", "address": "Z", "status": "delivered" }
        ]))
        .unwrap()
    }

    fn deliveries() -> Vec<Delivery> {
        serde_json::from_value(json!([
            { "_id": "d1", "status": "pending", "verificationStatus": "pending" },
            { "_id": "d2", "status": "assigned", "verificationStatus": "pending" },
            { "_id": "d3", "status": "delivered", "verificationStatus": "verified" },
            { "_id": "d4", "status": "failed", "verificationStatus": "rejected" },
            { "_id": "d5", "status": "delivered" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_unassigned_tab_shows_single_bill() {
        let bills = bills();
        let unassigned = StatusFilter::Only(BillStatus::Unassigned).apply(&bills);
        assert_eq!(unassigned.len(), 1);
        assert_eq!(unassigned[0].id, "1");
        assert!(unassigned[0].is_selectable());
        assert_eq!(bills.iter().filter(|b| b.is_selectable()).count(), 1);
    }

    #[test]
    fn test_filter_does_not_mutate_and_is_repeatable() {
        let bills = bills();
        let before = bills.clone();

        let all: Vec<String> = StatusFilter::<BillStatus>::All.apply(&bills).iter().map(|b| b.id.clone()).collect();
        let _ = StatusFilter::Only(BillStatus::Delivered).apply(&bills);
        let again: Vec<String> = StatusFilter::<BillStatus>::All.apply(&bills).iter().map(|b| b.id.clone()).collect();

        assert_eq!(all, again);
        assert_eq!(bills, before);
    }

    #[test]
    fn test_pending_tab_is_exact_match() {
        let deliveries = deliveries();
        let pending = StatusFilter::Only(DeliveryStatus::Pending).apply(&deliveries);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "d1");
    }

    #[test]
    fn test_verification_tab_counts() {
        let deliveries = deliveries();
        let counts: Vec<usize> = VERIFICATION_TABS
            .iter()
            .map(|tab| tab.filter.count(&deliveries))
            .collect();
        // 缺省的核验状态按 pending 计
        assert_eq!(counts, vec![5, 3, 1, 1]);
        assert_eq!(DEFAULT_VERIFICATION_FILTER.count(&deliveries), 3);
    }

    #[test]
    fn test_bill_tab_counts() {
        let bills = bills();
        let counts: Vec<usize> = BILL_TABS.iter().map(|tab| tab.filter.count(&bills)).collect();
        assert_eq!(counts, vec![3, 1, 1, 1]);
    }

    #[test]
    fn test_history_summary_and_query() {
        let summary = HistorySummary::from_deliveries(&deliveries());
        assert_eq!(
            summary,
            HistorySummary {
                total: 5,
                completed: 2,
                pending: 2,
                failed: 1
            }
        );

        assert_eq!(HISTORY_TABS[0].filter.query_value(), None);
        assert_eq!(HISTORY_TABS[1].filter.query_value(), Some(DeliveryStatus::Delivered));
    }
}
