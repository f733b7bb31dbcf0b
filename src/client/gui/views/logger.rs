use chrono::{DateTime, Local};
use iced::widget::{Button, Column, Container, Row, Space, Text};
use iced::{Alignment, Color, Element, Font, Length};

use crate::client::models::messages::Message;

const BANNER_BG: Color = Color::from_rgb(0.11, 0.12, 0.26);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Success,
    Error,
    Info,
    Warning,
}

impl LogLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Success => "OK",
            LogLevel::Error => "ERROR",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
        }
    }
}

/// An entry of the user-facing activity log. `seq` grows with every entry the
/// controller records, so a delayed clear can tell whether it is still current.
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub seq: u64,
    pub level: LogLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(seq: u64, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            seq,
            level,
            message: message.into(),
            at: Local::now(),
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self.level {
            LogLevel::Success => "✅",
            LogLevel::Error => "❌",
            LogLevel::Info => "ℹ️",
            LogLevel::Warning => "⚠️",
        }
    }

    pub fn color(&self) -> Color {
        match self.level {
            LogLevel::Success => Color::from_rgb(0.2, 0.8, 0.4),
            LogLevel::Error => Color::from_rgb(1.0, 0.2, 0.2),
            LogLevel::Info => Color::from_rgb(0.2, 0.6, 1.0),
            LogLevel::Warning => Color::from_rgb(1.0, 0.8, 0.0),
        }
    }

    /// "ERROR 14:02:11"
    pub fn heading(&self) -> String {
        format!("{} {}", self.level.label(), self.at.format("%H:%M:%S"))
    }
}

/// Hint for the entries hidden behind the banner.
pub fn earlier_entries(total: usize) -> Option<String> {
    match total {
        0 | 1 => None,
        2 => Some("+1 earlier entry".to_string()),
        n => Some(format!("+{} earlier entries", n - 1)),
    }
}

/// Banner for the latest log entry, with a dismiss button. Nothing when the log is empty.
pub fn logger_view(messages: &[LogMessage]) -> Element<'_, Message> {
    let Some(log) = messages.last() else {
        return Space::new(Length::Fill, Length::Fixed(0.0)).into();
    };
    let accent = log.color();

    let mut body = Column::new()
        .spacing(4)
        .width(Length::Fill)
        .push(Text::new(log.heading()).size(12).style(accent))
        .push(Text::new(&log.message).size(16).style(Color::WHITE));
    if let Some(hint) = earlier_entries(messages.len()) {
        body = body.push(Text::new(hint).size(11).style(Color::from_rgb(0.6, 0.62, 0.75)));
    }

    let dismiss = Button::new(Text::new("×").size(18))
        .style(iced::theme::Button::Text)
        .padding([2, 8])
        .on_press(Message::ClearLog(log.seq));

    Container::new(
        Row::new()
            .spacing(12)
            .align_items(Alignment::Center)
            .push(Text::new(log.emoji()).font(Font::with_name("Segoe UI Emoji")).size(20))
            .push(body)
            .push(Space::with_width(Length::Fixed(4.0)))
            .push(dismiss),
    )
    .padding([10, 14])
    .width(Length::Fill)
    .style(iced::theme::Container::Custom(Box::new(move |_: &iced::Theme| {
        iced::widget::container::Appearance {
            background: Some(iced::Background::Color(BANNER_BG)),
            text_color: Some(Color::WHITE),
            border: iced::Border {
                width: 2.0,
                color: accent,
                radius: 8.0.into(),
            },
            ..Default::default()
        }
    })))
    .into()
}
