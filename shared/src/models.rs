//! 领域模型 (Domain Models)
//!
//! 这些实体由服务端定义并持有，前端只负责消费。
//! 线上格式为 camelCase，主键序列化为 `_id`，枚举为 snake_case 字符串。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =========================================================
// 引用字段 (Populated References)
// =========================================================

/// 服务端可能返回已展开的对象，也可能只返回 id 字符串。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Populated(T),
    Id(String),
}

impl<T> Ref<T> {
    /// 已展开时返回对象
    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Populated(value) => Some(value),
            Ref::Id(_) => None,
        }
    }
}

// =========================================================
// 用户 (User)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Messenger,
    Coordinator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Messenger => "messenger",
            Role::Coordinator => "coordinator",
            Role::Admin => "admin",
        }
    }

    /// 当前角色是否满足目标角色的访问要求。
    ///
    /// `admin` 满足任何角色要求（沿用现有行为，待产品确认）。
    pub fn satisfies(&self, required: Role) -> bool {
        *self == Role::Admin || *self == required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// 登录 / 注册成功后的响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messenger {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Messenger {
    /// 下拉框中展示的标签，如 `John Smith (Zone A)`
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.name, self.area.as_deref().unwrap_or(""))
    }
}

/// 配送记录上展开的信使信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessengerRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

// =========================================================
// 账单 (Bill)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    #[default]
    RegularBill,
    DisconnectionNotice,
}

impl BillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::RegularBill => "regular_bill",
            BillType::DisconnectionNotice => "disconnection_notice",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "regular_bill" => Some(BillType::RegularBill),
            "disconnection_notice" => Some(BillType::DisconnectionNotice),
            _ => None,
        }
    }

    /// 完整名称，用于卡片展示
    pub fn label(&self) -> &'static str {
        match self {
            BillType::RegularBill => "Regular Bill",
            BillType::DisconnectionNotice => "Disconnection Notice",
        }
    }

    /// 简短名称，用于表格
    pub fn short_label(&self) -> &'static str {
        match self {
            BillType::RegularBill => "Bill",
            BillType::DisconnectionNotice => "Notice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Unassigned,
    Assigned,
    Delivered,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Unassigned => "unassigned",
            BillStatus::Assigned => "assigned",
            BillStatus::Delivered => "delivered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(rename = "_id")]
    pub id: String,
    pub account_number: String,
    pub customer_name: String,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub bill_type: BillType,
    #[serde(default)]
    pub billing_month: Option<DateTime<Utc>>,
    pub status: BillStatus,
    #[serde(default)]
    pub assigned_to: Option<Ref<MessengerRef>>,
}

impl Bill {
    /// 只有未分配的账单可以被勾选分配
    pub fn is_selectable(&self) -> bool {
        self.status == BillStatus::Unassigned
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.assigned_to
            .as_ref()
            .and_then(Ref::populated)
            .map(|m| m.name.as_str())
    }
}

/// 新建账单的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub account_number: String,
    pub customer_name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub bill_type: BillType,
    pub billing_month: NaiveDate,
}

/// 配送记录上展开的账单信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRef {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub bill_type: BillType,
}

// =========================================================
// 配送 (Delivery)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pending,
    Assigned,
    Delivered,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Failed => "failed",
        }
    }

    /// 派送顺序中的优先级，数值越小越靠前
    pub fn rank(&self) -> u8 {
        match self {
            DeliveryStatus::Pending => 0,
            DeliveryStatus::Assigned => 1,
            DeliveryStatus::Delivered => 2,
            DeliveryStatus::Failed => 3,
        }
    }

    /// 尚未完成的配送可以被标记为已送达或失败
    pub fn is_open(&self) -> bool {
        matches!(self, DeliveryStatus::Pending | DeliveryStatus::Assigned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofImage {
    pub url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub bill_id: Option<Ref<BillRef>>,
    #[serde(default)]
    pub messenger_id: Option<Ref<MessengerRef>>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub proof_images: Vec<ProofImage>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verification_notes: Option<String>,
}

impl Delivery {
    pub fn bill(&self) -> Option<&BillRef> {
        self.bill_id.as_ref().and_then(Ref::populated)
    }

    pub fn messenger(&self) -> Option<&MessengerRef> {
        self.messenger_id.as_ref().and_then(Ref::populated)
    }

    /// 账单地址；未展开时视为空字符串
    pub fn address(&self) -> &str {
        self.bill().map(|b| b.address.as_str()).unwrap_or("")
    }

    pub fn customer_name(&self) -> &str {
        self.bill()
            .map(|b| b.customer_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown Customer")
    }

    pub fn account_number(&self) -> &str {
        self.bill().map(|b| b.account_number.as_str()).unwrap_or("")
    }

    pub fn bill_type(&self) -> BillType {
        self.bill().map(|b| b.bill_type).unwrap_or_default()
    }

    pub fn messenger_name(&self) -> &str {
        self.messenger().map(|m| m.name.as_str()).unwrap_or("")
    }

    pub fn has_proof(&self) -> bool {
        !self.proof_images.is_empty()
    }
}

/// 路线 / 跟踪页的聚合统计（由服务端计算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub delivered: u32,
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<u32>,
}

/// `GET /messenger/routes` 与 `GET /coordinator/tracking` 的响应
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryBoard {
    #[serde(default)]
    pub deliveries: Vec<Delivery>,
    #[serde(default)]
    pub stats: Option<DeliveryStats>,
}

// =========================================================
// 报表 (Report)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessengerPerformance {
    pub messenger_name: String,
    #[serde(default)]
    pub assigned: u32,
    #[serde(default)]
    pub delivered: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    #[serde(default)]
    pub total_bills_processed: u32,
    #[serde(default)]
    pub total_bills_delivered: u32,
    #[serde(default)]
    pub total_disconnection_notices: u32,
    #[serde(default)]
    pub delivery_rate: f64,
    #[serde(default)]
    pub failure_count: u32,
    #[serde(default)]
    pub messenger_performance: Vec<MessengerPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStage {
    pub stage: String,
    /// 分钟
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalPath {
    #[serde(default)]
    pub stages: Vec<PathStage>,
    pub estimated_completion: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub data: ReportData,
    pub critical_path: CriticalPath,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delivery_with_populated_refs() {
        let delivery: Delivery = serde_json::from_value(json!({
            "_id": "d1",
            "billId": {
                "_id": "b1",
                "accountNumber": "ACC-001-2024",
                "customerName": "Acme Corporation",
                "address": "123 Main St, Downtown",
                "route": "Route-A",
                "billType": "disconnection_notice"
            },
            "messengerId": { "_id": "m1", "name": "John Smith" },
            "status": "assigned",
            "verificationStatus": "pending",
            "proofImages": [{ "url": "/uploads/p1.jpg", "timestamp": "2024-03-01T09:30:00.000Z" }]
        }))
        .unwrap();

        assert_eq!(delivery.address(), "123 Main St, Downtown");
        assert_eq!(delivery.messenger_name(), "John Smith");
        assert_eq!(delivery.bill_type(), BillType::DisconnectionNotice);
        assert!(delivery.has_proof());
        assert!(delivery.status.is_open());
    }

    #[test]
    fn test_delivery_with_unpopulated_bill() {
        let delivery: Delivery = serde_json::from_value(json!({
            "_id": "d2",
            "billId": "b2",
            "status": "failed",
            "failureReason": "Customer not home"
        }))
        .unwrap();

        assert!(delivery.bill().is_none());
        assert_eq!(delivery.address(), "");
        assert_eq!(delivery.customer_name(), "Unknown Customer");
        assert_eq!(delivery.verification_status, VerificationStatus::Pending);
        assert_eq!(delivery.failure_reason.as_deref(), Some("Customer not home"));
    }

    #[test]
    fn test_admin_satisfies_every_role() {
        assert!(Role::Admin.satisfies(Role::Coordinator));
        assert!(Role::Admin.satisfies(Role::Messenger));
        assert!(Role::Messenger.satisfies(Role::Messenger));
        assert!(!Role::Messenger.satisfies(Role::Coordinator));
        assert!(!Role::Coordinator.satisfies(Role::Messenger));
    }

    #[test]
    fn test_new_bill_wire_format() {
        let bill = NewBill {
            account_number: "ACC-9".to_string(),
            customer_name: "Jane".to_string(),
            address: "1 Road".to_string(),
            latitude: None,
            longitude: None,
            bill_type: BillType::RegularBill,
            billing_month: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        let value = serde_json::to_value(&bill).unwrap();
        assert_eq!(value["accountNumber"], "ACC-9");
        assert_eq!(value["billType"], "regular_bill");
        assert_eq!(value["billingMonth"], "2024-05-01");
        assert!(value.get("latitude").is_none());
    }
}
