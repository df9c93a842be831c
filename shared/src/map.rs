//! 地图选点 (Map Picker)
//!
//! 两种地图后端共享同一份选点状态；组件只负责把点击 / 搜索结果喂给 `MapSelection`。

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn label(&self, precision: usize) -> String {
        format!("{:.*}, {:.*}", precision, self.lat, precision, self.lng)
    }
}

/// 未提供初始坐标时的地图中心（拉各斯）
pub const DEFAULT_CENTER: LatLng = LatLng::new(6.5244, 3.3792);
pub const DEFAULT_ZOOM: u8 = 13;

/// 选点结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickedLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PickedLocation {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// 账单表单的地址：优先使用地理编码地址，否则为六位小数的坐标
    pub fn address_or_coords(&self) -> String {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.position().label(6))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Picked(PickedLocation),
    Cancelled,
}

/// 选点模态框的状态
#[derive(Debug, Clone, PartialEq)]
pub struct MapSelection {
    center: LatLng,
    selected: Option<LatLng>,
    address: Option<String>,
}

impl MapSelection {
    pub fn new(initial: Option<LatLng>) -> Self {
        let initial = initial.filter(LatLng::is_valid);
        Self {
            center: initial.unwrap_or(DEFAULT_CENTER),
            selected: initial,
            address: None,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn selected(&self) -> Option<LatLng> {
        self.selected
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// 地图点击：坐标更新，之前的地址失效
    pub fn select_point(&mut self, point: LatLng) {
        if !point.is_valid() {
            return;
        }
        self.selected = Some(point);
        self.address = None;
    }

    /// 地点搜索结果：带格式化地址，地图中心随之移动
    pub fn select_place(&mut self, point: LatLng, address: Option<String>) {
        if !point.is_valid() {
            return;
        }
        self.selected = Some(point);
        self.center = point;
        self.address = address.filter(|a| !a.trim().is_empty());
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.address = None;
    }

    /// "Choose Location" 按钮是否可用
    pub fn can_confirm(&self) -> bool {
        self.selected.is_some()
    }

    pub fn confirm(&self) -> Option<PickedLocation> {
        self.selected.map(|point| PickedLocation {
            lat: point.lat,
            lng: point.lng,
            address: self.address.clone(),
        })
    }

    pub fn coords_label(&self, precision: usize) -> Option<String> {
        self.selected.map(|point| point.label(precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_center_and_confirmation_gate() {
        let selection = MapSelection::new(None);
        assert_eq!(selection.center(), DEFAULT_CENTER);
        assert!(!selection.can_confirm());
        assert_eq!(selection.confirm(), None);
    }

    #[test]
    fn test_initial_position_is_selected() {
        let initial = LatLng::new(40.7128, -74.006);
        let selection = MapSelection::new(Some(initial));
        assert_eq!(selection.center(), initial);
        assert!(selection.can_confirm());
        assert_eq!(selection.coords_label(4).as_deref(), Some("40.7128, -74.0060"));
    }

    #[test]
    fn test_invalid_initial_falls_back() {
        let selection = MapSelection::new(Some(LatLng::new(f64::NAN, 3.0)));
        assert_eq!(selection.center(), DEFAULT_CENTER);
        assert!(!selection.can_confirm());
    }

    #[test]
    fn test_click_replaces_place_address() {
        let mut selection = MapSelection::new(None);
        selection.select_place(LatLng::new(6.45, 3.4), Some("Victoria Island, Lagos".to_string()));
        assert_eq!(selection.address(), Some("Victoria Island, Lagos"));
        assert_eq!(selection.center(), LatLng::new(6.45, 3.4));

        selection.select_point(LatLng::new(6.5, 3.35));
        assert_eq!(selection.address(), None);

        let picked = selection.confirm().unwrap();
        assert_eq!(picked.address_or_coords(), "6.500000, 3.350000");
    }

    #[test]
    fn test_clear_disables_confirm() {
        let mut selection = MapSelection::new(Some(DEFAULT_CENTER));
        selection.clear();
        assert!(!selection.can_confirm());
        assert_eq!(selection.coords_label(6), None);
    }

    #[test]
    fn test_address_preferred_over_coords() {
        let picked = PickedLocation {
            lat: 1.0,
            lng: 2.0,
            address: Some("12 Marina Rd".to_string()),
        };
        assert_eq!(picked.address_or_coords(), "12 Marina Rd");
    }
}
