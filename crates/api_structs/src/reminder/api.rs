use serde::{Deserialize, Serialize};

pub mod run_reminders_once {
    use super::*;
    use crate::dtos::ReminderDispatchDTO;

    #[derive(Debug, Deserialize)]
    pub struct QueryParams {
        pub token: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub ok: bool,
        pub processed: Vec<ReminderDispatchDTO>,
    }
}

pub mod send_test_sms {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct QueryParams {
        pub token: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub ok: bool,
        pub message: String,
    }
}
