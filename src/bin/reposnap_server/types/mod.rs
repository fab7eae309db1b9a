use super::*;

mod app_state;
mod payloads;

pub(crate) use self::app_state::AppState;
pub(crate) use self::payloads::{
    AnalyzeRequest, AnalyzeResponse, CloneResponse, FileContentResponse, FileListResponse,
    KeyQuery,
};
