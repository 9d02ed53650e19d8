use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
    }
}

pub mod get_reminders_health {
    use super::*;
    use crate::dtos::ReminderStateDTO;

    /// Count and contents of the currently-due reminders. Read-only
    /// operational visibility, no mutation behind it.
    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub ok: bool,
        pub count: usize,
        pub reminders: Vec<ReminderStateDTO>,
    }
}
