use serde::{Deserialize, Serialize};

use crate::core_service::{Notice, NoticeStyle};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InputRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivateRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignHotkeyRequest {
    pub name: String,
    pub hotkey: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveHotkeyRequest {
    pub hotkey: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationDto {
    pub name: String,
    pub is_running: bool,
    pub bundle_path: Option<String>,
    pub hotkey: Option<String>,
    pub subtitle: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewResponse {
    pub items: Vec<ApplicationDto>,
    pub is_loading: bool,
    pub search_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivatedResponse {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoticeDto {
    pub success: bool,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreRequest {
    Refresh,
    Input(InputRequest),
    Activate(ActivateRequest),
    AssignHotkey(AssignHotkeyRequest),
    RemoveHotkey(RemoveHotkeyRequest),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreResponse {
    View(ViewResponse),
    Activated(ActivatedResponse),
    Notice(NoticeDto),
}

impl From<Notice> for NoticeDto {
    fn from(value: Notice) -> Self {
        Self {
            success: value.style == NoticeStyle::Success,
            title: value.title,
            message: value.message,
        }
    }
}
