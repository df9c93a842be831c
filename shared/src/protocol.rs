use crate::models::{
    AuthResponse, Bill, Delivery, DeliveryBoard, DeliveryStatus, Messenger, NewBill, Report, Role,
    VerificationStatus,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// 变更类接口的响应体内容对前端无意义，统一按任意 JSON 接收
pub type Ack = serde_json::Value;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET / DELETE 不携带请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// 路径中的 id 通过 `#[serde(skip)]` 字段携带，不会进入请求体。
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base.
    fn path(&self) -> String;
    /// 实际使用的方法，默认取 `METHOD`
    fn method(&self) -> HttpMethod {
        Self::METHOD
    }
    /// Optional query string without the leading `?`.
    fn query(&self) -> Option<String> {
        None
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub area: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/register".to_string()
    }
}

// =========================================================
// 协调员: 信使管理
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMessengersRequest;

impl ApiRequest for ListMessengersRequest {
    type Response = Vec<Messenger>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/coordinator/messengers".to_string()
    }
}

/// 创建或更新信使；更新时密码留空则不修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessengerRequest {
    #[serde(skip)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub phone: String,
    pub area: String,
    pub employee_id: String,
}

impl ApiRequest for SaveMessengerRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        match &self.id {
            Some(id) => format!("/coordinator/messengers/{}", id),
            None => "/coordinator/messengers".to_string(),
        }
    }
    fn method(&self) -> HttpMethod {
        if self.id.is_some() {
            HttpMethod::Put
        } else {
            HttpMethod::Post
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteMessengerRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteMessengerRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/coordinator/messengers/{}", self.id)
    }
}

// =========================================================
// 协调员: 账单
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBillsRequest;

impl ApiRequest for ListBillsRequest {
    type Response = Vec<Bill>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/coordinator/bills".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBillsRequest {
    pub bills: Vec<NewBill>,
}

impl ApiRequest for CreateBillsRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/coordinator/bills".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignBillsRequest {
    pub bill_ids: Vec<String>,
    pub messenger_id: String,
}

impl ApiRequest for AssignBillsRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/coordinator/assign-bills".to_string()
    }
}

// =========================================================
// 协调员: 跟踪与核验
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackingRequest;

impl ApiRequest for TrackingRequest {
    type Response = DeliveryBoard;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/coordinator/tracking".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignDeliveryRequest {
    #[serde(skip)]
    pub delivery_id: String,
    pub new_messenger_id: String,
}

impl ApiRequest for ReassignDeliveryRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/coordinator/deliveries/{}/reassign", self.delivery_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyDeliveryRequest {
    #[serde(skip)]
    pub delivery_id: String,
    pub verification_status: VerificationStatus,
    pub verification_notes: String,
}

impl ApiRequest for VerifyDeliveryRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/coordinator/deliveries/{}/verify", self.delivery_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListAllDeliveriesRequest;

impl ApiRequest for ListAllDeliveriesRequest {
    type Response = Vec<Delivery>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/deliveries/".to_string()
    }
}

// =========================================================
// 信使
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessengerRoutesRequest;

impl ApiRequest for MessengerRoutesRequest {
    type Response = DeliveryBoard;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/messenger/routes".to_string()
    }
}

/// 配送历史，可按状态由服务端筛选
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeliveryHistoryRequest {
    #[serde(skip)]
    pub status: Option<DeliveryStatus>,
}

impl ApiRequest for DeliveryHistoryRequest {
    type Response = Vec<Delivery>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/messenger/deliveries".to_string()
    }
    fn query(&self) -> Option<String> {
        self.status.map(|s| format!("status={}", s.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(skip)]
    pub delivery_id: String,
    pub status: DeliveryStatus,
    pub failure_reason: String,
    pub notes: String,
}

impl ApiRequest for UpdateStatusRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        format!("/messenger/deliveries/{}/status", self.delivery_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProofRequest {
    #[serde(skip)]
    pub delivery_id: String,
    /// `data:image/jpeg;base64,...`
    pub image_data: String,
}

impl ApiRequest for UploadProofRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        format!("/messenger/deliveries/{}/proof", self.delivery_id)
    }
}

// =========================================================
// 报表
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateReportRequest {
    pub report_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateReportResponse {
    pub report: Report,
}

impl ApiRequest for GenerateReportRequest {
    type Response = GenerateReportResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/reports/dsr".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_ids_stay_out_of_body() {
        let req = ReassignDeliveryRequest {
            delivery_id: "d42".to_string(),
            new_messenger_id: "m7".to_string(),
        };
        assert_eq!(req.path(), "/coordinator/deliveries/d42/reassign");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "newMessengerId": "m7" })
        );
    }

    #[test]
    fn test_history_query_follows_status() {
        assert_eq!(DeliveryHistoryRequest::default().query(), None);
        let req = DeliveryHistoryRequest {
            status: Some(DeliveryStatus::Failed),
        };
        assert_eq!(req.query().as_deref(), Some("status=failed"));
    }

    #[test]
    fn test_save_messenger_switches_to_put_on_update() {
        let mut req = SaveMessengerRequest {
            id: None,
            name: "Jane Doe".to_string(),
            email: "m2@test.com".to_string(),
            password: String::new(),
            phone: String::new(),
            area: "Zone B".to_string(),
            employee_id: "M002".to_string(),
        };
        assert_eq!(req.method(), HttpMethod::Post);
        assert_eq!(req.path(), "/coordinator/messengers");

        req.id = Some("2".to_string());
        assert_eq!(req.method(), HttpMethod::Put);
        assert_eq!(req.path(), "/coordinator/messengers/2");

        let body = serde_json::to_value(&req).unwrap();
        assert!(body.get("password").is_none());
        assert_eq!(body["employeeId"], "M002");
    }

    #[test]
    fn test_verify_body() {
        let req = VerifyDeliveryRequest {
            delivery_id: "d1".to_string(),
            verification_status: VerificationStatus::Rejected,
            verification_notes: "Blurry photo".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "verificationStatus": "rejected", "verificationNotes": "Blurry photo" })
        );
    }
}
