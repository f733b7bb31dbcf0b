// Inline alert for rejected selections
use iced::widget::text;
use iced::{Color, Element};

use crate::client::models::messages::Message;

const ALERT_COLOR: Color = Color::from_rgb(1.0, 0.8, 0.0);

pub fn view<'a>(msg: &str) -> Element<'a, Message> {
    text(format!("ALERT: {}", msg)).size(14).style(ALERT_COLOR).into()
}
