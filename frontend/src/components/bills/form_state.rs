//! 新建账单表单状态
//!
//! 每个字段一个 `RwSignal`（`Copy`，可直接作为 Props 传递）；
//! 校验与请求体转换交给共享层的 `BillForm`。

use leptos::prelude::*;
use podtrack_shared::BillType;
use podtrack_shared::forms::BillForm;
use podtrack_shared::map::{LatLng, PickedLocation};

#[derive(Clone, Copy)]
pub struct BillFormState {
    pub account_number: RwSignal<String>,
    pub customer_name: RwSignal<String>,
    pub address: RwSignal<String>,
    pub latitude: RwSignal<String>,
    pub longitude: RwSignal<String>,
    pub bill_type: RwSignal<BillType>,
    pub billing_month: RwSignal<String>,
}

impl BillFormState {
    pub fn new() -> Self {
        let defaults = BillForm::default();
        Self {
            account_number: RwSignal::new(defaults.account_number),
            customer_name: RwSignal::new(defaults.customer_name),
            address: RwSignal::new(defaults.address),
            latitude: RwSignal::new(defaults.latitude),
            longitude: RwSignal::new(defaults.longitude),
            bill_type: RwSignal::new(defaults.bill_type),
            billing_month: RwSignal::new(defaults.billing_month),
        }
    }

    fn load(&self, form: BillForm) {
        self.account_number.set(form.account_number);
        self.customer_name.set(form.customer_name);
        self.address.set(form.address);
        self.latitude.set(form.latitude);
        self.longitude.set(form.longitude);
        self.bill_type.set(form.bill_type);
        self.billing_month.set(form.billing_month);
    }

    /// 重置为初始值（账单月份回到今天）
    pub fn reset(&self) {
        self.load(BillForm::default());
    }

    pub fn to_form(&self) -> BillForm {
        BillForm {
            account_number: self.account_number.get_untracked(),
            customer_name: self.customer_name.get_untracked(),
            address: self.address.get_untracked(),
            latitude: self.latitude.get_untracked(),
            longitude: self.longitude.get_untracked(),
            bill_type: self.bill_type.get_untracked(),
            billing_month: self.billing_month.get_untracked(),
        }
    }

    /// 写回地图选点结果
    pub fn apply_location(&self, picked: &PickedLocation) {
        let mut form = self.to_form();
        form.apply_location(picked);
        self.load(form);
    }

    pub fn position(&self) -> Option<LatLng> {
        self.to_form().position()
    }

    /// 表单下方的坐标提示；两个坐标都有时才显示
    pub fn coords_hint(&self) -> Option<String> {
        let lat = self.latitude.get();
        let lng = self.longitude.get();
        (!lat.is_empty() && !lng.is_empty()).then(|| format!("{}, {}", lat, lng))
    }
}

impl Default for BillFormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_location_fills_form() {
        let form = BillFormState::new();
        assert_eq!(form.position(), None);

        form.apply_location(&PickedLocation {
            lat: 6.5,
            lng: 3.25,
            address: None,
        });
        assert_eq!(form.latitude.get_untracked(), "6.500000");
        assert_eq!(form.longitude.get_untracked(), "3.250000");
        assert_eq!(form.address.get_untracked(), "6.500000, 3.250000");
        assert_eq!(form.position(), Some(LatLng::new(6.5, 3.25)));

        form.reset();
        assert!(form.address.get_untracked().is_empty());
        assert_eq!(form.position(), None);
    }
}
