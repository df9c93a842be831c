//! 信使表单状态
//!
//! 将零散的 signal 整合为 `MessengerFormState`，负责持有、预填、重置，
//! 以及转换为 `MessengerFormData` 交给共享层校验。

use leptos::prelude::*;
use podtrack_shared::Messenger;
use podtrack_shared::forms::MessengerFormData;

#[derive(Clone, Copy)]
pub struct MessengerFormState {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub phone: RwSignal<String>,
    pub area: RwSignal<String>,
    pub employee_id: RwSignal<String>,
    /// 正在编辑的信使；None 表示新建
    pub editing_id: RwSignal<Option<String>>,
}

impl MessengerFormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            area: RwSignal::new(String::new()),
            employee_id: RwSignal::new(String::new()),
            editing_id: RwSignal::new(None),
        }
    }

    fn load(&self, data: MessengerFormData) {
        self.name.set(data.name);
        self.email.set(data.email);
        self.password.set(data.password);
        self.phone.set(data.phone);
        self.area.set(data.area);
        self.employee_id.set(data.employee_id);
    }

    /// 编辑已有信使：预填字段，密码留空
    pub fn edit(&self, messenger: &Messenger) {
        self.load(MessengerFormData::from_messenger(messenger));
        self.editing_id.set(Some(messenger.id.clone()));
    }

    pub fn reset(&self) {
        self.load(MessengerFormData::default());
        self.editing_id.set(None);
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.with(Option::is_some)
    }

    pub fn to_data(&self) -> MessengerFormData {
        MessengerFormData {
            name: self.name.get_untracked(),
            email: self.email.get_untracked(),
            password: self.password.get_untracked(),
            phone: self.phone.get_untracked(),
            area: self.area.get_untracked(),
            employee_id: self.employee_id.get_untracked(),
        }
    }
}

impl Default for MessengerFormState {
    fn default() -> Self {
        Self::new()
    }
}
