use iced::widget::{Button, Column, Container, ProgressBar, Row, Text, TextInput};
use iced::{Alignment, Color, Element, Length};

use crate::client::gui::widgets::alert;
use crate::client::models::app_state::WorkflowController;
use crate::client::models::messages::Message;

const CARD_BG: Color = Color::from_rgb(0.18, 0.19, 0.36);
const TEXT_PRIMARY: Color = Color::WHITE;

fn card_appearance(_: &iced::Theme) -> iced::widget::container::Appearance {
    iced::widget::container::Appearance {
        background: Some(iced::Background::Color(CARD_BG)),
        text_color: Some(TEXT_PRIMARY),
        border: iced::Border {
            width: 1.0,
            color: Color::from_rgb(0.35, 0.36, 0.55),
            radius: 12.0.into(),
        },
        shadow: iced::Shadow {
            offset: iced::Vector::new(0.0, 4.0),
            blur_radius: 12.0,
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
        },
    }
}

pub fn view<'a>(state: &'a WorkflowController, file_path: &'a str) -> Element<'a, Message> {
    let enabled = state.can_upload();
    let caption = state.processing_status().unwrap_or("Upload a PDF");

    let mut path_input = TextInput::new("Path to a .pdf file", file_path).padding(10).size(14);
    let mut analyze = Button::new(Text::new("Analyze").size(14))
        .style(iced::theme::Button::Primary)
        .padding([10, 18]);
    if enabled {
        path_input = path_input
            .on_input(Message::FilePathChanged)
            .on_submit(Message::SubmitFile);
        analyze = analyze.on_press(Message::SubmitFile);
    }

    let mut content = Column::new()
        .spacing(14)
        .padding(20)
        .push(Text::new(caption).size(18).style(TEXT_PRIMARY))
        .push(
            Row::new()
                .spacing(10)
                .align_items(Alignment::Center)
                .push(path_input)
                .push(analyze),
        );

    if let Some(progress) = state.upload_progress() {
        content = content
            .push(ProgressBar::new(0.0..=1.0, progress.fraction()).height(Length::Fixed(8.0)))
            .push(Text::new(format!("Upload progress: {}%", progress.percent())).size(12));
    }

    if let Some(rejection) = state.last_rejection() {
        content = content.push(alert::view(&rejection.to_string()));
    }

    Container::new(content)
        .width(Length::Fill)
        .style(iced::theme::Container::Custom(Box::new(card_appearance)))
        .into()
}
