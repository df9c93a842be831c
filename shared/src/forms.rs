//! 表单模型 (Form Models)
//!
//! 输入框中的原始字符串 → 校验 → 请求体。校验失败时不发出任何请求。

use crate::date;
use crate::error::ValidationError;
use crate::models::{BillType, DeliveryStatus, Messenger, NewBill, Role, VerificationStatus};
use crate::protocol::{
    CreateBillsRequest, LoginRequest, RegisterRequest, SaveMessengerRequest, UpdateStatusRequest,
    VerifyDeliveryRequest,
};
use crate::map::{LatLng, PickedLocation};
use std::collections::HashMap;

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(value.to_string())
    }
}

fn email(value: &str) -> Result<String, ValidationError> {
    let value = required(value, "Email")?;
    match value.split_once('@') {
        Some((user, domain)) if !user.is_empty() && domain.contains('.') => Ok(value),
        _ => Err(ValidationError::InvalidEmail),
    }
}

fn optional_coord(value: &str, field: &'static str) -> Result<Option<f64>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or(ValidationError::InvalidNumber(field))
}

// =========================================================
// 账单
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BillForm {
    pub account_number: String,
    pub customer_name: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub bill_type: BillType,
    /// `YYYY-MM-DD`
    pub billing_month: String,
}

impl Default for BillForm {
    fn default() -> Self {
        Self {
            account_number: String::new(),
            customer_name: String::new(),
            address: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            bill_type: BillType::RegularBill,
            billing_month: date::to_input_value(date::today()),
        }
    }
}

impl BillForm {
    /// 地图选点结果写回表单
    pub fn apply_location(&mut self, picked: &PickedLocation) {
        self.latitude = format!("{:.6}", picked.lat);
        self.longitude = format!("{:.6}", picked.lng);
        self.address = picked.address_or_coords();
    }

    /// 已填写的坐标，用作地图选点的初始位置
    pub fn position(&self) -> Option<LatLng> {
        let lat = optional_coord(&self.latitude, "Latitude").ok()??;
        let lng = optional_coord(&self.longitude, "Longitude").ok()??;
        Some(LatLng::new(lat, lng)).filter(LatLng::is_valid)
    }

    pub fn validate(&self) -> Result<NewBill, ValidationError> {
        let account_number = required(&self.account_number, "Account number")?;
        let customer_name = required(&self.customer_name, "Customer name")?;
        let address = required(&self.address, "Address")?;
        let latitude = optional_coord(&self.latitude, "Latitude")?;
        let longitude = optional_coord(&self.longitude, "Longitude")?;
        if latitude.is_some() != longitude.is_some() {
            return Err(ValidationError::PartialCoordinates);
        }
        let billing_month = date::parse_input_date(&self.billing_month)
            .ok_or(ValidationError::Required("Billing month"))?;

        Ok(NewBill {
            account_number,
            customer_name,
            address,
            latitude,
            longitude,
            bill_type: self.bill_type,
            billing_month,
        })
    }

    pub fn to_request(&self) -> Result<CreateBillsRequest, ValidationError> {
        Ok(CreateBillsRequest {
            bills: vec![self.validate()?],
        })
    }
}

// =========================================================
// 信使
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessengerFormData {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub area: String,
    pub employee_id: String,
}

impl MessengerFormData {
    /// 编辑时预填，密码永远留空
    pub fn from_messenger(messenger: &Messenger) -> Self {
        Self {
            name: messenger.name.clone(),
            email: messenger.email.clone(),
            password: String::new(),
            phone: messenger.phone.clone().unwrap_or_default(),
            area: messenger.area.clone().unwrap_or_default(),
            employee_id: messenger.employee_id.clone().unwrap_or_default(),
        }
    }

    /// `id` 为 None 时为创建，此时密码必填
    pub fn to_request(&self, id: Option<&str>) -> Result<SaveMessengerRequest, ValidationError> {
        let name = required(&self.name, "Name")?;
        let email = email(&self.email)?;
        if id.is_none() && self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }

        Ok(SaveMessengerRequest {
            id: id.map(str::to_string),
            name,
            email,
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
            area: self.area.trim().to_string(),
            employee_id: self.employee_id.trim().to_string(),
        })
    }
}

// =========================================================
// 认证
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn to_request(&self) -> Result<LoginRequest, ValidationError> {
        let email = required(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        Ok(LoginRequest {
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone: String,
    pub area: String,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Messenger,
            phone: String::new(),
            area: String::new(),
        }
    }
}

impl RegisterForm {
    pub fn to_request(&self) -> Result<RegisterRequest, ValidationError> {
        let name = required(&self.name, "Name")?;
        let email = email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }
        Ok(RegisterRequest {
            name,
            email,
            password: self.password.clone(),
            role: self.role,
            phone: self.phone.trim().to_string(),
            area: self.area.trim().to_string(),
        })
    }
}

// =========================================================
// 配送状态 / 核验
// =========================================================

/// 标记失败：原因去除首尾空白后不能为空
pub fn failure_request(delivery_id: &str, reason: &str) -> Result<UpdateStatusRequest, ValidationError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ValidationError::MissingFailureReason);
    }
    Ok(UpdateStatusRequest {
        delivery_id: delivery_id.to_string(),
        status: DeliveryStatus::Failed,
        failure_reason: reason.to_string(),
        notes: String::new(),
    })
}

/// 核验页每个配送各自的备注
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationNotes {
    notes: HashMap<String, String>,
}

impl VerificationNotes {
    pub fn get(&self, delivery_id: &str) -> &str {
        self.notes.get(delivery_id).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, delivery_id: &str, note: String) {
        self.notes.insert(delivery_id.to_string(), note);
    }

    /// 构造核验请求；提交后该配送的备注被清除
    pub fn request(&mut self, delivery_id: &str, status: VerificationStatus) -> VerifyDeliveryRequest {
        let verification_notes = self.notes.remove(delivery_id).unwrap_or_default();
        VerifyDeliveryRequest {
            delivery_id: delivery_id.to_string(),
            verification_status: status,
            verification_notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bill_form() -> BillForm {
        BillForm {
            account_number: " ACC-100 ".to_string(),
            customer_name: "Tech Solutions Ltd".to_string(),
            address: "456 Oak Ave, Business District".to_string(),
            billing_month: "2024-03-01".to_string(),
            ..BillForm::default()
        }
    }

    #[test]
    fn test_bill_form_requires_fields() {
        let mut form = bill_form();
        form.customer_name = "   ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::Required("Customer name")));
    }

    #[test]
    fn test_bill_form_to_request() {
        let req = bill_form().to_request().unwrap();
        assert_eq!(req.bills.len(), 1);
        let bill = &req.bills[0];
        assert_eq!(bill.account_number, "ACC-100");
        assert_eq!(bill.billing_month, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(bill.latitude, None);
    }

    #[test]
    fn test_bill_form_coordinates() {
        let mut form = bill_form();
        form.latitude = "6.5".to_string();
        assert_eq!(form.validate(), Err(ValidationError::PartialCoordinates));

        form.longitude = "east".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidNumber("Longitude")));

        form.apply_location(&PickedLocation {
            lat: 6.4281,
            lng: 3.4219,
            address: None,
        });
        assert_eq!(form.address, "6.428100, 3.421900");
        let bill = form.validate().unwrap();
        assert_eq!(bill.latitude, Some(6.4281));
        assert_eq!(bill.longitude, Some(3.4219));
    }

    #[test]
    fn test_bill_form_position() {
        let mut form = bill_form();
        assert_eq!(form.position(), None);
        form.latitude = "6.4281".to_string();
        assert_eq!(form.position(), None);
        form.longitude = "3.4219".to_string();
        assert_eq!(form.position(), Some(LatLng::new(6.4281, 3.4219)));
        form.latitude = "123".to_string();
        assert_eq!(form.position(), None);
    }

    #[test]
    fn test_default_billing_month_is_today() {
        let form = BillForm::default();
        assert_eq!(date::parse_input_date(&form.billing_month), Some(date::today()));
    }

    #[test]
    fn test_messenger_password_only_required_on_create() {
        let form = MessengerFormData {
            name: "John Smith".to_string(),
            email: "messenger1@test.com".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_request(None), Err(ValidationError::Required("Password")));

        let update = form.to_request(Some("1")).unwrap();
        assert_eq!(update.id.as_deref(), Some("1"));
        assert!(update.password.is_empty());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let form = RegisterForm {
            name: "Jane".to_string(),
            email: "jane-at-example".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_request(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_failure_reason_required() {
        assert_eq!(
            failure_request("d1", "  \n "),
            Err(ValidationError::MissingFailureReason)
        );
        let req = failure_request("d1", " Customer not home ").unwrap();
        assert_eq!(req.status, DeliveryStatus::Failed);
        assert_eq!(req.failure_reason, "Customer not home");
        assert_eq!(req.delivery_id, "d1");
    }

    #[test]
    fn test_verification_notes_are_per_delivery() {
        let mut notes = VerificationNotes::default();
        notes.set("d1", "Clear photo".to_string());
        notes.set("d2", "Wrong house".to_string());

        let req = notes.request("d2", VerificationStatus::Rejected);
        assert_eq!(req.verification_notes, "Wrong house");
        assert_eq!(notes.get("d2"), "");
        assert_eq!(notes.get("d1"), "Clear photo");

        let req = notes.request("d3", VerificationStatus::Verified);
        assert_eq!(req.verification_notes, "");
    }
}
