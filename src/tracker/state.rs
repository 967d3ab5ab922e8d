use serde::Serialize;

use crate::db::models::Measurement;

pub const CREATED_MESSAGE: &str = "Medição registrada com sucesso!";
pub const CREATED_WITH_ALERT_PREFIX: &str = "Medição registrada!";
pub const UPDATED_MESSAGE: &str = "Medição atualizada com sucesso!";
pub const DELETED_MESSAGE: &str = "Medição excluída com sucesso!";

pub const LOAD_FAILED_PREFIX: &str = "Erro ao carregar medições";
pub const SAVE_FAILED_PREFIX: &str = "Erro ao salvar medição";
pub const UPDATE_FAILED_PREFIX: &str = "Erro ao atualizar medição";
pub const DELETE_FAILED_PREFIX: &str = "Erro ao excluir medição";

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    pub measurements: Vec<Measurement>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl TrackerState {
    pub fn is_idle(&self) -> bool {
        !self.is_loading && self.error_message.is_none() && self.success_message.is_none()
    }
}
