use serde::{Deserialize, Serialize};

use crate::bundle_source::BundleScanner;
use crate::contract::{
    ActivatedResponse, ApplicationDto, CoreRequest, CoreResponse, NoticeDto, ViewResponse,
};
use crate::core_service::{CoreService, InputOutcome, Notice, ServiceError};
use crate::hotkeys::HotkeyError;
use crate::model::ApplicationEntity;
use crate::shell::CommandRunner;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    InvalidRequest,
    NoApplications,
    Launch,
    HotkeyConflict,
    InvalidHotkey,
    Store,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok { response: CoreResponse },
    Err { error: ErrorResponse },
}

pub async fn handle_request<R, S, B>(
    service: &mut CoreService<R, S, B>,
    request: CoreRequest,
) -> TransportResponse
where
    R: CommandRunner,
    S: KeyValueStore,
    B: BundleScanner,
{
    match dispatch(service, request).await {
        Ok(response) => TransportResponse::Ok { response },
        Err(error) => TransportResponse::Err { error },
    }
}

pub async fn handle_json<R, S, B>(service: &mut CoreService<R, S, B>, payload: &str) -> String
where
    R: CommandRunner,
    S: KeyValueStore,
    B: BundleScanner,
{
    let response = match serde_json::from_str::<CoreRequest>(payload) {
        Ok(request) => handle_request(service, request).await,
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                title: "Invalid request".to_string(),
                message: error.to_string(),
            },
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|error| {
        format!(
            r#"{{"status":"err","error":{{"code":"invalid_json","title":"Encoding failed","message":{:?}}}}}"#,
            error.to_string()
        )
    })
}

/// Current list for the presentation layer, annotated with hotkeys.
pub fn view_response<R, S, B>(service: &CoreService<R, S, B>) -> ViewResponse
where
    R: CommandRunner,
    S: KeyValueStore,
    B: BundleScanner,
{
    let items = service.visible_apps();
    ViewResponse {
        items: items.iter().map(|entity| application_dto(service, entity)).collect(),
        is_loading: service.is_loading(),
        search_text: service.search_text().to_string(),
    }
}

async fn dispatch<R, S, B>(
    service: &mut CoreService<R, S, B>,
    request: CoreRequest,
) -> Result<CoreResponse, ErrorResponse>
where
    R: CommandRunner,
    S: KeyValueStore,
    B: BundleScanner,
{
    match request {
        CoreRequest::Refresh => {
            service.refresh().await.map_err(map_service_error)?;
            Ok(CoreResponse::View(view_response(service)))
        }
        CoreRequest::Input(input) => {
            match service
                .handle_input(&input.text)
                .await
                .map_err(map_service_error)?
            {
                InputOutcome::Activated(name) => {
                    Ok(CoreResponse::Activated(ActivatedResponse { name }))
                }
                InputOutcome::Filtered(_) => Ok(CoreResponse::View(view_response(service))),
            }
        }
        CoreRequest::Activate(activate) => {
            let name = required(&activate.name, "name")?;
            service
                .activate_by_name(&name)
                .await
                .map_err(map_service_error)?;
            Ok(CoreResponse::Activated(ActivatedResponse { name }))
        }
        CoreRequest::AssignHotkey(assign) => {
            let name = required(&assign.name, "name")?;
            let notice = service
                .assign_hotkey(&name, &assign.hotkey)
                .map_err(map_service_error)?;
            Ok(CoreResponse::Notice(NoticeDto::from(notice)))
        }
        CoreRequest::RemoveHotkey(remove) => {
            let notice = service
                .remove_hotkey(&remove.hotkey)
                .map_err(map_service_error)?;
            Ok(CoreResponse::Notice(NoticeDto::from(notice)))
        }
    }
}

fn application_dto<R, S, B>(service: &CoreService<R, S, B>, entity: &ApplicationEntity) -> ApplicationDto
where
    R: CommandRunner,
    S: KeyValueStore,
    B: BundleScanner,
{
    ApplicationDto {
        name: entity.name.clone(),
        is_running: entity.is_running,
        bundle_path: entity
            .bundle_path
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned()),
        hotkey: service.hotkey_for(&entity.name).map(str::to_string),
        subtitle: service.subtitle_for(entity),
    }
}

fn required(value: &str, field: &str) -> Result<String, ErrorResponse> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ErrorResponse {
            code: ErrorCode::InvalidRequest,
            title: "Invalid request".to_string(),
            message: format!("{field} is required"),
        });
    }
    Ok(trimmed.to_string())
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    let notice = Notice::from_error(&error);
    let code = match &error {
        ServiceError::Config(_) => ErrorCode::Config,
        ServiceError::NoApplications => ErrorCode::NoApplications,
        ServiceError::Launch { .. } => ErrorCode::Launch,
        ServiceError::Hotkey {
            source: HotkeyError::Conflict { .. },
            ..
        } => ErrorCode::HotkeyConflict,
        ServiceError::Hotkey { .. } => ErrorCode::InvalidHotkey,
        ServiceError::HotkeyPersist { .. } => ErrorCode::Store,
    };
    ErrorResponse {
        code,
        title: notice.title,
        message: notice.message,
    }
}
