//! 账单批量选择 (Bill Selection)

use crate::error::ValidationError;
use crate::models::Bill;
use crate::protocol::AssignBillsRequest;

/// 已勾选的账单 id，按勾选顺序保存
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillSelection {
    ids: Vec<String>,
}

impl BillSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// 切换单个账单；不可选的账单被忽略
    pub fn toggle(&mut self, bill: &Bill) {
        if let Some(pos) = self.ids.iter().position(|id| *id == bill.id) {
            self.ids.remove(pos);
        } else if bill.is_selectable() {
            self.ids.push(bill.id.clone());
        }
    }

    /// 勾选当前视图中所有可选账单
    pub fn select_all(&mut self, visible: &[&Bill]) {
        for bill in visible.iter().filter(|b| b.is_selectable()) {
            if !self.contains(&bill.id) {
                self.ids.push(bill.id.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// 表头复选框状态：视图中至少有一个可选账单且全部已勾选
    pub fn is_all_selected(&self, visible: &[&Bill]) -> bool {
        let mut selectable = visible.iter().filter(|b| b.is_selectable()).peekable();
        selectable.peek().is_some() && selectable.all(|b| self.contains(&b.id))
    }

    /// 重新获取账单后，剔除已不再是未分配状态（或已消失）的 id
    pub fn retain_selectable(&mut self, bills: &[Bill]) {
        self.ids.retain(|id| {
            bills
                .iter()
                .any(|bill| bill.id == *id && bill.is_selectable())
        });
    }

    pub fn to_assignment(&self, messenger_id: &str) -> Result<AssignBillsRequest, ValidationError> {
        let messenger_id = messenger_id.trim();
        if messenger_id.is_empty() || self.ids.is_empty() {
            return Err(ValidationError::IncompleteAssignment);
        }
        Ok(AssignBillsRequest {
            bill_ids: self.ids.clone(),
            messenger_id: messenger_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillStatus;
    use serde_json::json;

    fn bill(id: &str, status: &str) -> Bill {
        serde_json::from_value(json!({
            "_id": id,
            "accountNumber": format!("ACC-{}", id),
            "customerName": "Customer",
            "address": "Somewhere",
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn test_only_unassigned_can_be_selected() {
        let unassigned = bill("1", "unassigned");
        let assigned = bill("2", "assigned");
        let mut selection = BillSelection::new();

        selection.toggle(&assigned);
        assert!(selection.is_empty());

        selection.toggle(&unassigned);
        assert!(selection.contains("1"));

        selection.toggle(&unassigned);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_in_view() {
        let bills = vec![bill("1", "unassigned"), bill("2", "assigned"), bill("3", "unassigned")];
        let visible: Vec<&Bill> = bills.iter().collect();
        let mut selection = BillSelection::new();

        assert!(!selection.is_all_selected(&visible));
        selection.select_all(&visible);
        assert_eq!(selection.ids(), ["1".to_string(), "3".to_string()]);
        assert!(selection.is_all_selected(&visible));

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_all_selected_requires_selectable_rows() {
        let bills = vec![bill("2", "assigned")];
        let visible: Vec<&Bill> = bills.iter().collect();
        assert!(!BillSelection::new().is_all_selected(&visible));
        assert!(!BillSelection::new().is_all_selected(&[]));
    }

    #[test]
    fn test_retain_after_refetch() {
        let mut bills = vec![bill("1", "unassigned"), bill("3", "unassigned")];
        let mut selection = BillSelection::new();
        let visible: Vec<&Bill> = bills.iter().collect();
        selection.select_all(&visible);

        bills[0].status = BillStatus::Assigned;
        bills.pop();
        selection.retain_selectable(&bills);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_assignment_validation() {
        let mut selection = BillSelection::new();
        assert_eq!(
            selection.to_assignment("m1"),
            Err(ValidationError::IncompleteAssignment)
        );

        selection.toggle(&bill("7", "unassigned"));
        assert_eq!(
            selection.to_assignment("  "),
            Err(ValidationError::IncompleteAssignment)
        );

        let req = selection.to_assignment("m1").unwrap();
        assert_eq!(req.bill_ids, vec!["7".to_string()]);
        assert_eq!(req.messenger_id, "m1");
    }
}
