mod fetch_due_reminders;
mod process_due_reminders;
mod send_test_sms;
#[cfg(test)]
pub(crate) mod test_helpers;

use actix_web::web;
use process_due_reminders::run_reminders_once_controller;
use send_test_sms::send_test_sms_controller;

pub use process_due_reminders::ProcessDueRemindersUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/debug/run-once",
        web::get().to(run_reminders_once_controller),
    );
    cfg.route(
        "/debug/send-test",
        web::get().to(send_test_sms_controller),
    );
}
