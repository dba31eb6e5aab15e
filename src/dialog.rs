use log::warn;
use native_dialog::{MessageDialog, MessageType};

use crate::app::Alert;

fn message_type(alert: Alert) -> MessageType {
    match alert {
        Alert::NoTimeSet => MessageType::Warning,
        Alert::Completed => MessageType::Info,
    }
}

/// Show an alert as a native message box.
///
/// Blocks until the user acknowledges it. Failing to open the dialog is
/// logged and otherwise ignored.
pub fn show(alert: Alert) {
    let result = MessageDialog::new()
        .set_type(message_type(alert))
        .set_title(alert.title())
        .set_text(alert.text())
        .show_alert();

    if let Err(e) = result {
        warn!("Failed to show '{}' dialog: {}", alert.title(), e);
    }
}
