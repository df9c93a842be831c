//! 派送顺序 (Delivery Sequencing)
//!
//! 信使路线页的卡片顺序：先按状态优先级，再按地址升序。
//! 排序稳定，相同键保持服务端返回的顺序。

use crate::models::Delivery;

/// 原地排序
pub fn sort_deliveries(deliveries: &mut [Delivery]) {
    // slice::sort_by 为稳定排序
    deliveries.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.address().cmp(b.address()))
    });
}

/// 取得所有权并返回排好序的列表
pub fn sequenced(mut deliveries: Vec<Delivery>) -> Vec<Delivery> {
    sort_deliveries(&mut deliveries);
    deliveries
}

/// 路线标签：唯一路线名，或 `Multiple Routes (n)`；无路线信息时为 None
pub fn route_label(deliveries: &[Delivery]) -> Option<String> {
    let mut routes: Vec<&str> = Vec::new();
    for route in deliveries
        .iter()
        .filter_map(|d| d.bill().and_then(|b| b.route.as_deref()))
        .filter(|r| !r.is_empty())
    {
        if !routes.contains(&route) {
            routes.push(route);
        }
    }

    match routes.as_slice() {
        [] => None,
        [single] => Some(single.to_string()),
        many => Some(format!("Multiple Routes ({})", many.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillRef, DeliveryStatus, Ref, VerificationStatus};

    fn delivery(id: &str, status: DeliveryStatus, address: Option<&str>, route: Option<&str>) -> Delivery {
        Delivery {
            id: id.to_string(),
            bill_id: address.map(|addr| {
                Ref::Populated(BillRef {
                    id: format!("b-{}", id),
                    account_number: String::new(),
                    customer_name: String::new(),
                    address: addr.to_string(),
                    route: route.map(str::to_string),
                    bill_type: Default::default(),
                })
            }),
            messenger_id: None,
            status,
            verification_status: VerificationStatus::Pending,
            proof_images: Vec::new(),
            failure_reason: None,
            delivery_date: None,
            verification_notes: None,
        }
    }

    fn ids(list: &[Delivery]) -> Vec<&str> {
        list.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_groups_by_rank_then_address() {
        let list = sequenced(vec![
            delivery("1", DeliveryStatus::Failed, Some("A St"), None),
            delivery("2", DeliveryStatus::Delivered, Some("B St"), None),
            delivery("3", DeliveryStatus::Pending, Some("Z St"), None),
            delivery("4", DeliveryStatus::Assigned, Some("C St"), None),
            delivery("5", DeliveryStatus::Pending, Some("M St"), None),
        ]);
        assert_eq!(ids(&list), vec!["5", "3", "4", "2", "1"]);
    }

    #[test]
    fn test_stable_for_equal_keys() {
        let list = sequenced(vec![
            delivery("first", DeliveryStatus::Assigned, Some("Same Rd"), None),
            delivery("second", DeliveryStatus::Assigned, Some("Same Rd"), None),
            delivery("third", DeliveryStatus::Assigned, Some("Same Rd"), None),
        ]);
        assert_eq!(ids(&list), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_bill_sorts_first_within_rank() {
        let list = sequenced(vec![
            delivery("with", DeliveryStatus::Pending, Some("A St"), None),
            delivery("without", DeliveryStatus::Pending, None, None),
        ]);
        assert_eq!(ids(&list), vec!["without", "with"]);
    }

    #[test]
    fn test_ordinal_comparison_is_case_sensitive() {
        let list = sequenced(vec![
            delivery("lower", DeliveryStatus::Pending, Some("apple Way"), None),
            delivery("upper", DeliveryStatus::Pending, Some("Zebra Ln"), None),
        ]);
        assert_eq!(ids(&list), vec!["upper", "lower"]);
    }

    #[test]
    fn test_idempotent() {
        let once = sequenced(vec![
            delivery("a", DeliveryStatus::Delivered, Some("2 Rd"), None),
            delivery("b", DeliveryStatus::Pending, Some("9 Rd"), None),
            delivery("c", DeliveryStatus::Pending, Some("1 Rd"), None),
        ]);
        let twice = sequenced(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_route_label() {
        assert_eq!(route_label(&[]), None);

        let single = vec![
            delivery("1", DeliveryStatus::Pending, Some("x"), Some("Route-A")),
            delivery("2", DeliveryStatus::Pending, Some("y"), Some("Route-A")),
            delivery("3", DeliveryStatus::Pending, None, None),
        ];
        assert_eq!(route_label(&single).as_deref(), Some("Route-A"));

        let multiple = vec![
            delivery("1", DeliveryStatus::Pending, Some("x"), Some("Route-A")),
            delivery("2", DeliveryStatus::Pending, Some("y"), Some("Route-B")),
            delivery("3", DeliveryStatus::Pending, Some("z"), Some("Route-C")),
        ];
        assert_eq!(route_label(&multiple).as_deref(), Some("Multiple Routes (3)"));
    }
}
